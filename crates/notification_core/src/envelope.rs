//! Delivery envelope decoding.
//!
//! The relay delivers one or more notifications per invocation under a
//! `Records` array. Records arrive either straight from the topic (`Sns`
//! member) or through a subscribed queue, in which case the record `body`
//! holds the topic's notification document as a JSON string.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::contract::StatusMessage;
use crate::error::NotificationError;

pub const QUEUE_EVENT_SOURCE: &str = "aws:sqs";

/// A single notification as published to the topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "Subject", default)]
    pub subject: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
}

impl Notification {
    pub fn subject_or_empty(&self) -> &str {
        self.subject.as_deref().unwrap_or_default()
    }

    pub fn status_message(&self) -> Result<StatusMessage, NotificationError> {
        StatusMessage::parse(&self.message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryChannel {
    Topic,
    Queue,
}

/// Ordered records of one delivery, decoded on demand so that a malformed
/// record only fails once processing reaches it.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryEnvelope {
    records: Vec<Value>,
}

impl DeliveryEnvelope {
    pub fn from_value(event: Value) -> Result<Self, NotificationError> {
        let Value::Object(mut object) = event else {
            return Err(NotificationError::decode(
                "delivery envelope must be a JSON object",
            ));
        };

        match object.remove("Records") {
            Some(Value::Array(records)) => Ok(Self { records }),
            _ => Err(NotificationError::decode(
                "delivery envelope must include Records array",
            )),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn notifications(
        &self,
    ) -> impl Iterator<Item = Result<(DeliveryChannel, Notification), NotificationError>> + '_ {
        self.records.iter().map(decode_record)
    }
}

pub fn decode_record(record: &Value) -> Result<(DeliveryChannel, Notification), NotificationError> {
    if let Some(sns) = record.get("Sns") {
        let notification = Notification::deserialize(sns).map_err(|error| {
            NotificationError::decode(format!("invalid topic notification: {error}"))
        })?;
        return Ok((DeliveryChannel::Topic, notification));
    }

    if is_queue_record(record) {
        let body = record
            .get("body")
            .and_then(Value::as_str)
            .ok_or_else(|| NotificationError::decode("queue record body must be a string"))?;
        let notification: Notification = serde_json::from_str(body).map_err(|error| {
            NotificationError::decode(format!("invalid queued notification: {error}"))
        })?;
        return Ok((DeliveryChannel::Queue, notification));
    }

    Err(NotificationError::decode(
        "record is neither a topic nor a queue delivery",
    ))
}

fn is_queue_record(record: &Value) -> bool {
    record
        .get("eventSource")
        .and_then(Value::as_str)
        .map(|source| source == QUEUE_EVENT_SOURCE)
        .unwrap_or(false)
}
