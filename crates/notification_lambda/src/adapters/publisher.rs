#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub message_id: Option<String>,
}

pub trait TopicPublisher {
    fn publish(&self, topic_arn: &str, subject: &str, message: &str)
        -> Result<PublishReceipt, String>;
}
