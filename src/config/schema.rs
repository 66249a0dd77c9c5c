//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the webhook.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Default deny list location.
pub const DEFAULT_LIST_URL: &str =
    "https://cdn.jsdelivr.net/gh/ilyasaftr/disposable-email-domains@main/lists/deny.txt";

/// Root configuration for the webhook service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WebhookConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Webhook authentication.
    pub webhook: AuthConfig,

    /// Domain list sources and refresh cadence.
    pub sources: SourcesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Total time allowed for a request in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body in bytes.
    pub max_body_size: usize,

    /// How long in-flight requests may drain after shutdown begins.
    pub shutdown_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 15,
            max_body_size: 1024 * 1024, // 1MB
            shutdown_timeout_secs: 30,
        }
    }
}

/// API key protecting the validation endpoints.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected `X-API-Key` value. Required.
    pub api_key: String,
}

/// Remote domain list configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SourcesConfig {
    /// List URLs, tried in this order on every refresh.
    pub urls: Vec<String>,

    /// Seconds between refreshes.
    pub refresh_interval_secs: u64,

    /// Per-source fetch deadline in seconds.
    pub fetch_timeout_secs: u64,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            urls: vec![DEFAULT_LIST_URL.to_string()],
            refresh_interval_secs: 30 * 60,
            fetch_timeout_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format ("text" or "json").
    pub log_format: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "text".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WebhookConfig::default();
        assert_eq!(config.server.bind_address, "0.0.0.0:8080");
        assert_eq!(config.sources.urls, vec![DEFAULT_LIST_URL.to_string()]);
        assert_eq!(config.sources.refresh_interval_secs, 1800);
        assert_eq!(config.sources.fetch_timeout_secs, 30);
        assert_eq!(config.server.shutdown_timeout_secs, 30);
        assert!(config.webhook.api_key.is_empty());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: WebhookConfig = toml::from_str(
            r#"
            [webhook]
            api_key = "secret"

            [sources]
            urls = ["https://a.example/list.txt", "https://b.example/list.txt"]
            "#,
        )
        .unwrap();

        assert_eq!(config.webhook.api_key, "secret");
        assert_eq!(config.sources.urls.len(), 2);
        assert_eq!(config.sources.refresh_interval_secs, 1800);
        assert_eq!(config.server.max_body_size, 1024 * 1024);
        assert_eq!(config.observability.log_level, "info");
    }
}
