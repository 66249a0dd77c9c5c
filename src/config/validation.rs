//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (intervals > 0, addresses parse)
//! - Check every source is an http(s) URL
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: WebhookConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::WebhookConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "json"];

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("webhook.api_key must be set")]
    MissingApiKey,

    #[error("sources.urls must contain at least one URL")]
    NoSources,

    #[error("invalid source URL '{url}': {reason}")]
    InvalidSourceUrl { url: String, reason: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("invalid socket address for {field}: '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("unknown log level '{0}'")]
    UnknownLogLevel(String),

    #[error("unknown log format '{0}'")]
    UnknownLogFormat(String),
}

/// Check a loaded configuration, collecting every problem found.
pub fn validate_config(config: &WebhookConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.webhook.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }

    if config.sources.urls.is_empty() {
        errors.push(ValidationError::NoSources);
    }
    for raw in &config.sources.urls {
        if let Err(reason) = check_source_url(raw) {
            errors.push(ValidationError::InvalidSourceUrl {
                url: raw.clone(),
                reason,
            });
        }
    }

    for (field, value) in [
        ("sources.refresh_interval_secs", config.sources.refresh_interval_secs),
        ("sources.fetch_timeout_secs", config.sources.fetch_timeout_secs),
        ("server.request_timeout_secs", config.server.request_timeout_secs),
        ("server.shutdown_timeout_secs", config.server.shutdown_timeout_secs),
        ("server.max_body_size", config.server.max_body_size as u64),
    ] {
        if value == 0 {
            errors.push(ValidationError::ZeroValue { field });
        }
    }

    check_address("server.bind_address", &config.server.bind_address, &mut errors);
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(config.observability.log_level.clone()));
    }
    let format = config.observability.log_format.to_ascii_lowercase();
    if !LOG_FORMATS.contains(&format.as_str()) {
        errors.push(ValidationError::UnknownLogFormat(config.observability.log_format.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_source_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("unsupported scheme '{}'", other)),
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> WebhookConfig {
        let mut config = WebhookConfig::default();
        config.webhook.api_key = "secret".to_string();
        config
    }

    #[test]
    fn test_defaults_with_key_are_valid() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn test_default_config_requires_api_key() {
        let errors = validate_config(&WebhookConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingApiKey]);
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = valid_config();
        config.sources.urls = vec!["ftp://lists.example/deny.txt".into(), "not a url".into()];
        config.sources.refresh_interval_secs = 0;
        config.server.bind_address = "localhost".into();
        config.observability.log_level = "verbose".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5, "{errors:?}");
        assert!(errors.contains(&ValidationError::ZeroValue {
            field: "sources.refresh_interval_secs"
        }));
        assert!(errors.contains(&ValidationError::UnknownLogLevel("verbose".into())));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidSourceUrl { url, .. } if url.starts_with("ftp"))));
    }

    #[test]
    fn test_empty_source_list_rejected() {
        let mut config = valid_config();
        config.sources.urls.clear();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::NoSources]));
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = valid_config();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
