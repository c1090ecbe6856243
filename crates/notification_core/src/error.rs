use thiserror::Error;

/// Failure raised anywhere along the publish or notify path.
///
/// Handlers never recover from these locally; they log and hand the error
/// back to the runtime so the invocation fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotificationError {
    #[error("decode failed: {0}")]
    Decode(String),
    #[error("serialization failed: {0}")]
    Serialize(String),
    #[error("publish failed: {0}")]
    Publish(String),
    #[error("send email failed: {0}")]
    SendEmail(String),
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl NotificationError {
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Short machine-readable label used in structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::Serialize(_) => "serialization_error",
            Self::Publish(_) => "publish_failed",
            Self::SendEmail(_) => "send_email_failed",
            Self::Configuration(_) => "misconfiguration",
        }
    }
}
