use notification_core::NotificationError;
use tracing::debug;

use crate::adapters::parameters::ParameterSource;

pub const TOPIC_ARN_ENV: &str = "TOPIC_ARN";
pub const TOPIC_ARN_PARAMETER_ENV: &str = "TOPIC_ARN_PARAMETER";
pub const DEFAULT_TOPIC_ARN_PARAMETER: &str = "EventTopicArn";
pub const SENDER_ADDRESS_ENV: &str = "SENDER_ADDRESS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProducerConfig {
    pub topic_arn: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerConfig {
    pub sender_address: String,
}

/// Resolves the producer's topic.
///
/// `TOPIC_ARN` wins when set. Otherwise the ARN is read from the parameter
/// store under `TOPIC_ARN_PARAMETER` (default `EventTopicArn`).
pub fn resolve_producer_config(
    env: impl Fn(&str) -> Option<String>,
    parameters: &dyn ParameterSource,
) -> Result<ProducerConfig, NotificationError> {
    if let Some(topic_arn) = non_blank(env(TOPIC_ARN_ENV)) {
        return Ok(ProducerConfig { topic_arn });
    }

    let parameter_name = non_blank(env(TOPIC_ARN_PARAMETER_ENV))
        .unwrap_or_else(|| DEFAULT_TOPIC_ARN_PARAMETER.to_string());
    debug!(
        component = "config",
        parameter = %parameter_name,
        "topic arn not in environment, reading parameter store"
    );

    let topic_arn = parameters
        .get_parameter(&parameter_name)
        .map_err(|error| {
            NotificationError::configuration(format!(
                "{TOPIC_ARN_ENV} is not set and parameter '{parameter_name}' could not be read: {error}"
            ))
        })?;

    non_blank(Some(topic_arn))
        .map(|topic_arn| ProducerConfig { topic_arn })
        .ok_or_else(|| {
            NotificationError::configuration(format!("parameter '{parameter_name}' is empty"))
        })
}

pub fn resolve_consumer_config(
    env: impl Fn(&str) -> Option<String>,
) -> Result<ConsumerConfig, NotificationError> {
    non_blank(env(SENDER_ADDRESS_ENV))
        .map(|sender_address| ConsumerConfig { sender_address })
        .ok_or_else(|| {
            NotificationError::configuration(format!("{SENDER_ADDRESS_ENV} must be configured"))
        })
}

pub fn process_env(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    struct StaticParameters {
        values: HashMap<String, String>,
        requested: Mutex<Vec<String>>,
    }

    impl StaticParameters {
        fn new(values: &[(&str, &str)]) -> Self {
            Self {
                values: values
                    .iter()
                    .map(|(name, value)| (name.to_string(), value.to_string()))
                    .collect(),
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested(&self) -> Vec<String> {
            self.requested.lock().expect("poisoned mutex").clone()
        }
    }

    impl ParameterSource for StaticParameters {
        fn get_parameter(&self, name: &str) -> Result<String, String> {
            self.requested
                .lock()
                .expect("poisoned mutex")
                .push(name.to_string());
            self.values
                .get(name)
                .cloned()
                .ok_or_else(|| format!("ParameterNotFound: {name}"))
        }
    }

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn environment_topic_skips_parameter_store() {
        let parameters = StaticParameters::new(&[("EventTopicArn", "arn:from-ssm")]);
        let config =
            resolve_producer_config(env_of(&[("TOPIC_ARN", "arn:from-env")]), &parameters)
                .expect("config should resolve");

        assert_eq!(config.topic_arn, "arn:from-env");
        assert!(parameters.requested().is_empty());
    }

    #[test]
    fn blank_topic_falls_back_to_default_parameter() {
        let parameters = StaticParameters::new(&[("EventTopicArn", "arn:from-ssm")]);
        let config = resolve_producer_config(env_of(&[("TOPIC_ARN", "  ")]), &parameters)
            .expect("config should resolve");

        assert_eq!(config.topic_arn, "arn:from-ssm");
        assert_eq!(parameters.requested(), vec!["EventTopicArn".to_string()]);
    }

    #[test]
    fn parameter_name_can_be_overridden() {
        let parameters = StaticParameters::new(&[("/relay/topic", "arn:custom")]);
        let config = resolve_producer_config(
            env_of(&[("TOPIC_ARN_PARAMETER", "/relay/topic")]),
            &parameters,
        )
        .expect("config should resolve");

        assert_eq!(config.topic_arn, "arn:custom");
    }

    #[test]
    fn missing_topic_everywhere_is_configuration_error() {
        let parameters = StaticParameters::new(&[]);
        let error = resolve_producer_config(env_of(&[]), &parameters)
            .expect_err("config should fail");

        assert!(matches!(error, NotificationError::Configuration(_)));
        assert!(error.to_string().contains("EventTopicArn"));
    }

    #[test]
    fn consumer_requires_sender_address() {
        let error = resolve_consumer_config(env_of(&[("SENDER_ADDRESS", "")]))
            .expect_err("blank sender should fail");
        assert!(error.to_string().contains("SENDER_ADDRESS must be configured"));

        let config = resolve_consumer_config(env_of(&[("SENDER_ADDRESS", "noreply@example.com")]))
            .expect("sender should resolve");
        assert_eq!(config.sender_address, "noreply@example.com");
    }
}
