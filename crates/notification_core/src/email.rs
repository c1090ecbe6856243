use serde::{Deserialize, Serialize};

use crate::envelope::Notification;
use crate::error::NotificationError;

pub const EMAIL_CHARSET: &str = "UTF-8";

/// Plain-text email handed to the mail service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailRequest {
    pub to_addresses: Vec<String>,
    pub subject: String,
    pub body: String,
    pub charset: String,
    pub source: String,
}

/// Builds the email for a notification, or `None` when its kind is not one
/// the consumer notifies on.
pub fn email_for_notification(
    notification: &Notification,
    sender_address: &str,
) -> Result<Option<EmailRequest>, NotificationError> {
    let message = notification.status_message()?;
    if !message.kind.is_notifiable() {
        return Ok(None);
    }

    Ok(Some(EmailRequest {
        to_addresses: vec![message.recipient()?.to_string()],
        subject: notification.subject_or_empty().to_string(),
        body: message.body()?.to_string(),
        charset: EMAIL_CHARSET.to_string(),
        source: sender_address.to_string(),
    }))
}
