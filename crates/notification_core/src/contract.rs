use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::NotificationError;

pub const SUCCESS_STATUS: i64 = 0;
pub const WORKFLOW_STATUS_SUBJECT: &str = "Workflow Status";

pub const STATUS_FIELD: &str = "status";
pub const KIND_FIELD: &str = "type";
pub const RECIPIENT_FIELD: &str = "requestor_email";
pub const BODY_FIELD: &str = "message";

pub type WorkEvent = Map<String, Value>;

/// Discriminates which downstream handling a status message receives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageKind {
    /// Stamped by the producer on every processed work event.
    ContractStatus,
    /// The only kind the consumer turns into an email.
    RequestStatus,
    Other(String),
}

impl MessageKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::ContractStatus => "ContractStatus",
            Self::RequestStatus => "RequestStatus",
            Self::Other(value) => value,
        }
    }

    pub fn is_notifiable(&self) -> bool {
        matches!(self, Self::RequestStatus)
    }
}

impl From<String> for MessageKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "ContractStatus" => Self::ContractStatus,
            "RequestStatus" => Self::RequestStatus,
            _ => Self::Other(value),
        }
    }
}

impl From<MessageKind> for String {
    fn from(value: MessageKind) -> Self {
        value.as_str().to_string()
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message body carried inside a notification, after parsing.
///
/// Only the kind tag is inspected at decode time. Every other field stays an
/// untyped JSON value until the kind matches, so messages of other kinds are
/// never rejected for the shape of fields the consumer does not read.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: MessageKind,
    fields: WorkEvent,
}

impl StatusMessage {
    pub fn parse(text: &str) -> Result<Self, NotificationError> {
        let fields: WorkEvent = serde_json::from_str(text).map_err(|error| {
            NotificationError::decode(format!("invalid status message: {error}"))
        })?;

        let kind = match fields.get(KIND_FIELD) {
            Some(Value::String(tag)) => MessageKind::from(tag.clone()),
            Some(other) => MessageKind::Other(other.to_string()),
            None => {
                return Err(NotificationError::decode(format!(
                    "invalid status message: missing '{KIND_FIELD}'"
                )))
            }
        };

        Ok(Self { kind, fields })
    }

    pub fn fields(&self) -> &WorkEvent {
        &self.fields
    }

    pub fn status(&self) -> Option<i64> {
        self.fields.get(STATUS_FIELD).and_then(Value::as_i64)
    }

    pub fn recipient(&self) -> Result<&str, NotificationError> {
        self.string_field(RECIPIENT_FIELD)
    }

    pub fn body(&self) -> Result<&str, NotificationError> {
        self.string_field(BODY_FIELD)
    }

    fn string_field(&self, name: &str) -> Result<&str, NotificationError> {
        match self.fields.get(name) {
            Some(Value::String(value)) => Ok(value.as_str()),
            Some(_) => Err(NotificationError::decode(format!(
                "status message field '{name}' must be a string"
            ))),
            None => Err(NotificationError::decode(format!(
                "status message is missing '{name}'"
            ))),
        }
    }
}

/// Body of the producer's success response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishAcknowledgment {
    pub message: String,
}

impl PublishAcknowledgment {
    pub fn for_topic(topic_arn: &str) -> Self {
        Self {
            message: format!("message sent via {topic_arn}"),
        }
    }
}

/// Adds the completion status and producer kind tag to an inbound event.
///
/// Existing `status` or `type` values are overwritten; every other field is
/// left untouched.
pub fn stamp_work_event(payload: Value) -> Result<WorkEvent, NotificationError> {
    let Value::Object(mut event) = payload else {
        return Err(NotificationError::decode(
            "work event payload must be a JSON object",
        ));
    };

    event.insert(STATUS_FIELD.to_string(), Value::from(SUCCESS_STATUS));
    event.insert(
        KIND_FIELD.to_string(),
        Value::from(MessageKind::ContractStatus.as_str()),
    );
    Ok(event)
}

pub fn serialize_work_event(event: &WorkEvent) -> Result<String, NotificationError> {
    serde_json::to_string(event).map_err(|error| NotificationError::Serialize(error.to_string()))
}
