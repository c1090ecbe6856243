//! AWS-oriented adapters and handlers for the status notification relay.
//!
//! This crate owns runtime integration details (Lambda handlers, adapter
//! traits for the topic, mail service and parameter store, configuration and
//! log setup). Message contract and envelope decoding live in
//! `notification_core`.

pub mod adapters;
pub mod config;
pub mod handlers;
pub mod logging;
