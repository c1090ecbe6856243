use aws_sdk_ses::types::{Body, Content, Destination, Message};
use lambda_runtime::{service_fn, Error, LambdaEvent};
use notification_core::email::EmailRequest;
use notification_lambda::adapters::mailer::{MailSender, SendReceipt};
use notification_lambda::config::{process_env, resolve_consumer_config};
use notification_lambda::handlers::consumer::{handle_consumer_event, ConsumerSummary};
use notification_lambda::logging;
use serde_json::Value;

struct SesMailSender {
    ses_client: aws_sdk_ses::Client,
}

impl MailSender for SesMailSender {
    fn send_email(&self, request: &EmailRequest) -> Result<SendReceipt, String> {
        let client = self.ses_client.clone();
        let source = request.source.clone();
        let destination = Destination::builder()
            .set_to_addresses(Some(request.to_addresses.clone()))
            .build();
        let message = build_message(request)?;

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .send_email()
                    .source(source)
                    .destination(destination)
                    .message(message)
                    .send()
                    .await
                    .map(|output| SendReceipt {
                        message_id: output.message_id().to_string(),
                    })
                    .map_err(|error| format!("failed to send email via ses: {error}"))
            })
        })
    }
}

fn build_message(request: &EmailRequest) -> Result<Message, String> {
    let content = |data: &str| {
        Content::builder()
            .data(data)
            .charset(request.charset.clone())
            .build()
            .map_err(|error| format!("invalid email content: {error}"))
    };

    Ok(Message::builder()
        .subject(content(&request.subject)?)
        .body(Body::builder().text(content(&request.body)?).build())
        .build())
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ConsumerSummary, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let span = tracing::info_span!("invocation", request_id = %event.context.request_id);
    let _entered = span.enter();

    let config = resolve_consumer_config(process_env).map_err(|error| {
        tracing::error!(component = "consumer_handler", event = "config_failed", error = %error);
        Error::from(error)
    })?;
    let mailer = SesMailSender {
        ses_client: aws_sdk_ses::Client::new(&aws_config),
    };

    handle_consumer_event(event.payload, &config, &mailer).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();
    lambda_runtime::run(service_fn(handle_request)).await
}
