//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::WebhookConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then process environment
/// overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<WebhookConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => WebhookConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
///
/// Empty values are treated as unset.
pub fn apply_env_overrides<F>(config: &mut WebhookConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(port) = var("WEBHOOK_PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            var: "WEBHOOK_PORT",
            value: port.clone(),
        })?;
        config.server.bind_address = format!("0.0.0.0:{}", port);
    }

    if let Some(key) = var("WEBHOOK_API_KEY") {
        config.webhook.api_key = key;
    }

    if let Some(urls) = var("DISPOSABLE_LIST_URLS") {
        config.sources.urls = urls
            .split(',')
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(raw) = var("DISPOSABLE_LIST_UPDATE_INTERVAL") {
        config.sources.refresh_interval_secs = parse_duration_secs(&raw).ok_or(ConfigError::Env {
            var: "DISPOSABLE_LIST_UPDATE_INTERVAL",
            value: raw.clone(),
        })?;
    }

    if let Some(raw) = var("DISPOSABLE_FETCH_TIMEOUT") {
        config.sources.fetch_timeout_secs = parse_duration_secs(&raw).ok_or(ConfigError::Env {
            var: "DISPOSABLE_FETCH_TIMEOUT",
            value: raw.clone(),
        })?;
    }

    if let Some(level) = var("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    if let Some(format) = var("LOG_FORMAT") {
        config.observability.log_format = format;
    }

    if let Some(raw) = var("METRICS_ENABLED") {
        config.observability.metrics_enabled = raw.trim().parse().map_err(|_| ConfigError::Env {
            var: "METRICS_ENABLED",
            value: raw.clone(),
        })?;
    }

    if let Some(addr) = var("METRICS_ADDRESS") {
        config.observability.metrics_address = addr;
    }

    Ok(())
}

/// Parse durations like `30m`, `1h 30m`, `500ms` or bare seconds into whole
/// seconds, rounding sub-second remainders up.
pub fn parse_duration_secs(raw: &str) -> Option<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(secs) = raw.parse::<u64>() {
        return Some(secs);
    }

    let duration = humantime::parse_duration(raw).ok()?;
    let extra = u64::from(duration.subsec_nanos() > 0);
    duration.as_secs().checked_add(extra)
}
