//! Shared notification relay primitives.
//!
//! This crate owns the status message contract, delivery envelope decoding,
//! and email request construction. It excludes AWS SDK and Lambda runtime
//! concerns, which live in `notification_lambda`.

pub mod contract;
pub mod email;
pub mod envelope;
pub mod error;

pub use error::NotificationError;
