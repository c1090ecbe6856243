use notification_core::contract::{
    serialize_work_event, stamp_work_event, PublishAcknowledgment, WORKFLOW_STATUS_SUBJECT,
};
use notification_core::NotificationError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::adapters::publisher::TopicPublisher;
use crate::config::ProducerConfig;

const COMPONENT: &str = "producer_handler";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiGatewayResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: Value,
    pub body: String,
}

/// Stamps the inbound event and republishes it to the configured topic.
///
/// A failed publish is logged and returned unchanged; nothing is retried.
pub fn handle_producer_event(
    event: Value,
    config: &ProducerConfig,
    publisher: &dyn TopicPublisher,
) -> Result<ApiGatewayResponse, NotificationError> {
    info!(component = COMPONENT, event = "event_received", payload = %event);

    let result = publish_status(event, config, publisher);
    if let Err(failure) = &result {
        error!(
            component = COMPONENT,
            event = "publish_failed",
            error_code = failure.code(),
            topic_arn = %config.topic_arn,
            error = %failure,
        );
    }
    result
}

fn publish_status(
    event: Value,
    config: &ProducerConfig,
    publisher: &dyn TopicPublisher,
) -> Result<ApiGatewayResponse, NotificationError> {
    let stamped = stamp_work_event(event)?;
    let message = serialize_work_event(&stamped)?;
    info!(component = COMPONENT, event = "event_stamped", stamped_event = %message);

    let receipt = publisher
        .publish(&config.topic_arn, WORKFLOW_STATUS_SUBJECT, &message)
        .map_err(NotificationError::Publish)?;
    info!(
        component = COMPONENT,
        event = "message_published",
        topic_arn = %config.topic_arn,
        message_id = receipt.message_id.as_deref().unwrap_or(""),
    );

    success_response(PublishAcknowledgment::for_topic(&config.topic_arn))
}

fn success_response(payload: impl Serialize) -> Result<ApiGatewayResponse, NotificationError> {
    let body = serde_json::to_string(&payload)
        .map_err(|error| NotificationError::Serialize(error.to_string()))?;
    Ok(ApiGatewayResponse {
        status_code: 200,
        headers: json!({"Content-Type": "application/json"}),
        body,
    })
}
