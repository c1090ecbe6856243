use lambda_runtime::{service_fn, Error, LambdaEvent};
use notification_lambda::adapters::parameters::ParameterSource;
use notification_lambda::adapters::publisher::{PublishReceipt, TopicPublisher};
use notification_lambda::config::{process_env, resolve_producer_config};
use notification_lambda::handlers::producer::{handle_producer_event, ApiGatewayResponse};
use notification_lambda::logging;
use serde_json::Value;

struct SnsTopicPublisher {
    sns_client: aws_sdk_sns::Client,
}

impl TopicPublisher for SnsTopicPublisher {
    fn publish(
        &self,
        topic_arn: &str,
        subject: &str,
        message: &str,
    ) -> Result<PublishReceipt, String> {
        let client = self.sns_client.clone();
        let topic_arn = topic_arn.to_string();
        let subject = subject.to_string();
        let message = message.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .publish()
                    .topic_arn(topic_arn)
                    .subject(subject)
                    .message(message)
                    .send()
                    .await
                    .map(|output| PublishReceipt {
                        message_id: output.message_id().map(str::to_string),
                    })
                    .map_err(|error| format!("failed to publish to sns topic: {error}"))
            })
        })
    }
}

struct SsmParameterSource {
    ssm_client: aws_sdk_ssm::Client,
}

impl ParameterSource for SsmParameterSource {
    fn get_parameter(&self, name: &str) -> Result<String, String> {
        let client = self.ssm_client.clone();
        let parameter_name = name.to_string();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .get_parameter()
                    .name(parameter_name.clone())
                    .send()
                    .await
                    .map_err(|error| format!("failed to read ssm parameter: {error}"))
                    .and_then(|output| {
                        output
                            .parameter()
                            .and_then(|parameter| parameter.value())
                            .map(str::to_string)
                            .ok_or_else(|| {
                                format!("ssm parameter '{parameter_name}' has no value")
                            })
                    })
            })
        })
    }
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ApiGatewayResponse, Error> {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let span = tracing::info_span!("invocation", request_id = %event.context.request_id);
    let _entered = span.enter();

    let parameters = SsmParameterSource {
        ssm_client: aws_sdk_ssm::Client::new(&aws_config),
    };
    let config = resolve_producer_config(process_env, &parameters).map_err(|error| {
        tracing::error!(component = "producer_handler", event = "config_failed", error = %error);
        Error::from(error)
    })?;
    let publisher = SnsTopicPublisher {
        sns_client: aws_sdk_sns::Client::new(&aws_config),
    };

    handle_producer_event(event.payload, &config, &publisher).map_err(Error::from)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    logging::init();
    lambda_runtime::run(service_fn(handle_request)).await
}
