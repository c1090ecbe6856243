use notification_core::email::EmailRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: String,
}

pub trait MailSender {
    fn send_email(&self, request: &EmailRequest) -> Result<SendReceipt, String>;
}
