use notification_core::email::email_for_notification;
use notification_core::envelope::DeliveryEnvelope;
use notification_core::NotificationError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

use crate::adapters::mailer::MailSender;
use crate::config::ConsumerConfig;

const COMPONENT: &str = "consumer_handler";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConsumerSummary {
    pub notifications: usize,
    pub emails_sent: usize,
}

/// Emails every `RequestStatus` notification in the envelope, in order.
///
/// Other kinds are skipped without logging. The first decode or send failure
/// stops the remaining notifications and is returned after logging.
pub fn handle_consumer_event(
    event: Value,
    config: &ConsumerConfig,
    mailer: &dyn MailSender,
) -> Result<ConsumerSummary, NotificationError> {
    info!(component = COMPONENT, event = "envelope_received", payload = %event);

    let mut summary = ConsumerSummary {
        notifications: 0,
        emails_sent: 0,
    };
    let result = deliver_notifications(event, config, mailer, &mut summary);
    if let Err(failure) = &result {
        error!(
            component = COMPONENT,
            event = "notification_failed",
            error_code = failure.code(),
            notifications_processed = summary.notifications,
            emails_sent = summary.emails_sent,
            error = %failure,
        );
    }
    result.map(|()| summary)
}

fn deliver_notifications(
    event: Value,
    config: &ConsumerConfig,
    mailer: &dyn MailSender,
    summary: &mut ConsumerSummary,
) -> Result<(), NotificationError> {
    let envelope = DeliveryEnvelope::from_value(event)?;

    for decoded in envelope.notifications() {
        let (channel, notification) = decoded?;
        let email = email_for_notification(&notification, &config.sender_address)?;
        summary.notifications += 1;
        let Some(email) = email else {
            continue;
        };

        let receipt = mailer
            .send_email(&email)
            .map_err(NotificationError::SendEmail)?;
        summary.emails_sent += 1;
        info!(
            component = COMPONENT,
            event = "email_sent",
            channel = ?channel,
            recipient = %email.to_addresses.join(","),
            subject = %email.subject,
            message_id = %receipt.message_id,
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use notification_core::email::EmailRequest;
    use serde_json::json;

    use super::*;
    use crate::adapters::mailer::SendReceipt;

    struct CapturingMailer {
        sent: Mutex<Vec<EmailRequest>>,
    }

    impl CapturingMailer {
        fn new() -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
            }
        }

        fn sent(&self) -> Vec<EmailRequest> {
            self.sent.lock().expect("poisoned mutex").clone()
        }
    }

    impl MailSender for CapturingMailer {
        fn send_email(&self, request: &EmailRequest) -> Result<SendReceipt, String> {
            let mut sent = self.sent.lock().expect("poisoned mutex");
            sent.push(request.clone());
            Ok(SendReceipt {
                message_id: format!("ses-{}", sent.len()),
            })
        }
    }

    struct RejectingMailer;

    impl MailSender for RejectingMailer {
        fn send_email(&self, _: &EmailRequest) -> Result<SendReceipt, String> {
            Err("MessageRejected: Email address is not verified".to_string())
        }
    }

    fn sample_config() -> ConsumerConfig {
        ConsumerConfig {
            sender_address: "noreply@example.com".to_string(),
        }
    }

    fn topic_record(subject: &str, message: Value) -> Value {
        json!({
            "EventSource": "aws:sns",
            "Sns": {
                "Type": "Notification",
                "Subject": subject,
                "Message": message.to_string()
            }
        })
    }

    fn request_status(email: &str, body: &str) -> Value {
        json!({
            "type": "RequestStatus",
            "requestor_email": email,
            "message": body
        })
    }

    #[test]
    fn matching_notification_sends_one_email() {
        let mailer = CapturingMailer::new();
        let summary = handle_consumer_event(
            json!({"Records": [topic_record(
                "Workflow Status",
                request_status("requestor@example.com", "Request 7 approved"),
            )]}),
            &sample_config(),
            &mailer,
        )
        .expect("consumer should succeed");

        assert_eq!(
            summary,
            ConsumerSummary {
                notifications: 1,
                emails_sent: 1
            }
        );
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_addresses, vec!["requestor@example.com".to_string()]);
        assert_eq!(sent[0].subject, "Workflow Status");
        assert_eq!(sent[0].body, "Request 7 approved");
        assert_eq!(sent[0].source, "noreply@example.com");
        assert_eq!(sent[0].charset, "UTF-8");
    }

    #[test]
    fn non_matching_kind_sends_nothing() {
        let mailer = CapturingMailer::new();
        let summary = handle_consumer_event(
            json!({"Records": [topic_record(
                "Workflow Status",
                json!({"type": "ContractStatus", "status": 0}),
            )]}),
            &sample_config(),
            &mailer,
        )
        .expect("consumer should succeed");

        assert_eq!(summary.emails_sent, 0);
        assert_eq!(summary.notifications, 1);
        assert!(mailer.sent().is_empty());
    }

    #[test]
    fn parse_failure_stops_remaining_notifications() {
        let mailer = CapturingMailer::new();
        let envelope = json!({"Records": [
            topic_record("first", request_status("a@example.com", "one")),
            topic_record("second", json!({"type": "ContractStatus"})),
            {"Sns": {"Subject": "third", "Message": "{not json"}},
            topic_record("fourth", request_status("d@example.com", "four")),
        ]});

        let error = handle_consumer_event(envelope, &sample_config(), &mailer)
            .expect_err("malformed message should fail");

        assert!(matches!(error, NotificationError::Decode(_)));
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "first");
    }

    #[test]
    fn send_failure_is_returned_unchanged() {
        let error = handle_consumer_event(
            json!({"Records": [topic_record(
                "Workflow Status",
                request_status("requestor@example.com", "done"),
            )]}),
            &sample_config(),
            &RejectingMailer,
        )
        .expect_err("send should fail");

        assert_eq!(
            error,
            NotificationError::SendEmail("MessageRejected: Email address is not verified".to_string())
        );
    }

    #[test]
    fn queue_delivered_notifications_are_emailed() {
        let mailer = CapturingMailer::new();
        let body = json!({
            "Type": "Notification",
            "Subject": "Workflow Status",
            "Message": request_status("queued@example.com", "via queue").to_string()
        })
        .to_string();

        handle_consumer_event(
            json!({"Records": [{"eventSource": "aws:sqs", "body": body}]}),
            &sample_config(),
            &mailer,
        )
        .expect("consumer should succeed");

        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to_addresses, vec!["queued@example.com".to_string()]);
    }

    #[test]
    fn empty_envelope_is_a_no_op() {
        let mailer = CapturingMailer::new();
        let summary = handle_consumer_event(json!({"Records": []}), &sample_config(), &mailer)
            .expect("empty envelope should succeed");

        assert_eq!(summary.notifications, 0);
        assert!(mailer.sent().is_empty());
    }
}
