//! Configuration for the subscription pass, sourced from environment
//! variables at startup.

use std::env;

/// Errors raised while reading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Settings driving one subscription reconciliation pass.
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Region the log groups live in.
    pub region: String,
    /// Only log groups under this name prefix are reconciled.
    pub log_group_prefix: String,
    /// ARN of the delivery stream subscription filters route into.
    pub destination_arn: String,
    /// ARN of the role CloudWatch assumes to write to the destination.
    pub role_arn: String,
    /// Name given to the subscription filter on every log group.
    pub filter_name: String,
    /// Pattern selecting which log lines enter the stream.
    pub filter_pattern: String,
    /// Name of the shipping function itself. Log groups ending with this
    /// suffix are skipped so the shipper never consumes its own logs.
    pub shipper_function_name: String,
    /// Retention applied to every reconciled log group, in days.
    pub retention_days: i32,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            log_group_prefix: "/aws/lambda/".to_string(),
            destination_arn: String::new(),
            role_arn: String::new(),
            filter_name: "loghose".to_string(),
            filter_pattern: String::new(),
            shipper_function_name: "loghose-shipper".to_string(),
            retention_days: 30,
        }
    }
}

impl SubscriberConfig {
    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = SubscriberConfig::default();

        let region = env::var("LOGHOSE_REGION")
            .or_else(|_| env::var("AWS_REGION"))
            .unwrap_or(defaults.region);
        let log_group_prefix =
            env::var("LOGHOSE_LOG_GROUP_PREFIX").unwrap_or(defaults.log_group_prefix);
        let destination_arn = env::var("LOGHOSE_DESTINATION_ARN").unwrap_or_default();
        let role_arn = env::var("LOGHOSE_ROLE_ARN").unwrap_or_default();
        let filter_name = env::var("LOGHOSE_FILTER_NAME").unwrap_or(defaults.filter_name);
        let filter_pattern = env::var("LOGHOSE_FILTER_PATTERN").unwrap_or_default();
        let shipper_function_name =
            env::var("LOGHOSE_SHIPPER_NAME").unwrap_or(defaults.shipper_function_name);
        let retention_days = env::var("LOGHOSE_RETENTION_DAYS")
            .ok()
            .and_then(|days| days.parse::<i32>().ok())
            .unwrap_or(defaults.retention_days);

        let config = Self {
            region,
            log_group_prefix,
            destination_arn,
            role_arn,
            filter_name,
            filter_pattern,
            shipper_function_name,
            retention_days,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.destination_arn.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "LOGHOSE_DESTINATION_ARN cannot be empty".to_string(),
            ));
        }

        if self.role_arn.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "LOGHOSE_ROLE_ARN cannot be empty".to_string(),
            ));
        }

        if self.filter_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "LOGHOSE_FILTER_NAME cannot be empty".to_string(),
            ));
        }

        if self.shipper_function_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "LOGHOSE_SHIPPER_NAME cannot be empty".to_string(),
            ));
        }

        if self.retention_days <= 0 {
            return Err(ConfigError::Invalid(
                "LOGHOSE_RETENTION_DAYS must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn create_test_config() -> SubscriberConfig {
        SubscriberConfig {
            destination_arn: "arn:aws:kinesis:us-east-1:123456789012:stream/logs".to_string(),
            role_arn: "arn:aws:iam::123456789012:role/cloudwatch-to-kinesis".to_string(),
            ..Default::default()
        }
    }

    fn clear_env() {
        for key in &[
            "LOGHOSE_REGION",
            "AWS_REGION",
            "LOGHOSE_LOG_GROUP_PREFIX",
            "LOGHOSE_DESTINATION_ARN",
            "LOGHOSE_ROLE_ARN",
            "LOGHOSE_FILTER_NAME",
            "LOGHOSE_FILTER_PATTERN",
            "LOGHOSE_SHIPPER_NAME",
            "LOGHOSE_RETENTION_DAYS",
        ] {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_config_with_arns_is_valid() {
        let config = create_test_config();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_config_fails_validation() {
        // No destination ARN by default
        let config = SubscriberConfig::default();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_retention_days() {
        let config = SubscriberConfig {
            retention_days: 0,
            ..create_test_config()
        };
        assert!(config.validate().is_err());

        let config = SubscriberConfig {
            retention_days: -7,
            ..create_test_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_empty_filter_name() {
        let config = SubscriberConfig {
            filter_name: "   ".to_string(),
            ..create_test_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_requires_arns() {
        clear_env();
        assert!(SubscriberConfig::from_env().is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_with_overrides() {
        clear_env();
        std::env::set_var("LOGHOSE_REGION", "eu-west-2");
        std::env::set_var("LOGHOSE_DESTINATION_ARN", "arn:stream");
        std::env::set_var("LOGHOSE_ROLE_ARN", "arn:role");
        std::env::set_var("LOGHOSE_RETENTION_DAYS", "14");
        std::env::set_var("LOGHOSE_SHIPPER_NAME", "my-shipper");

        let config = SubscriberConfig::from_env().expect("config should be valid");
        assert_eq!(config.region, "eu-west-2");
        assert_eq!(config.destination_arn, "arn:stream");
        assert_eq!(config.role_arn, "arn:role");
        assert_eq!(config.retention_days, 14);
        assert_eq!(config.shipper_function_name, "my-shipper");
        // Untouched values fall back to defaults
        assert_eq!(config.log_group_prefix, "/aws/lambda/");

        clear_env();
    }

    #[test]
    #[serial]
    fn test_from_env_ignores_unparsable_retention() {
        clear_env();
        std::env::set_var("LOGHOSE_DESTINATION_ARN", "arn:stream");
        std::env::set_var("LOGHOSE_ROLE_ARN", "arn:role");
        std::env::set_var("LOGHOSE_RETENTION_DAYS", "not-a-number");

        let config = SubscriberConfig::from_env().expect("config should be valid");
        assert_eq!(config.retention_days, 30);

        clear_env();
    }
}
