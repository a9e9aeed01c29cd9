//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the callback gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backend definitions, in routing order.
    pub backends: Vec<BackendConfig>,

    /// Catch-all upstream (host:port) for callbacks that match no backend.
    pub default_upstream: Option<String>,

    /// Logging settings.
    pub logging: LoggingConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request size limits.
    pub limits: LimitsConfig,

    /// Metrics settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// A backend serving one callback prefix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Normalized callback identifier this backend handles.
    pub callback_prefix: String,

    /// Backend address (e.g., "127.0.0.1:3000").
    pub host: String,
}

impl BackendConfig {
    pub fn new(callback_prefix: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            callback_prefix: callback_prefix.into(),
            host: host.into(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Directory holding the append-only `app.log`. Stdout only when unset.
    pub log_dir: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_dir: None,
            level: "info".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request size limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum buffered body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Flat JSON layout: `{"host": ..., "log_dir": ..., "backends": [...]}`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct FlatJsonConfig {
    pub host: String,
    #[serde(default)]
    pub log_dir: Option<String>,
    #[serde(default)]
    pub backends: Vec<BackendConfig>,
    #[serde(default)]
    pub default_upstream: Option<String>,
}

impl From<FlatJsonConfig> for GatewayConfig {
    fn from(flat: FlatJsonConfig) -> Self {
        Self {
            listener: ListenerConfig {
                bind_address: flat.host,
            },
            backends: flat.backends,
            default_upstream: flat.default_upstream,
            logging: LoggingConfig {
                log_dir: flat.log_dir,
                ..LoggingConfig::default()
            },
            ..GatewayConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [[backends]]
            callback_prefix = "approve_req"
            host = "b1:9001"
            "#,
        )
        .unwrap();

        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.backends, vec![BackendConfig::new("approve_req", "b1:9001")]);
        assert_eq!(config.timeouts.request_secs, 30);
        assert!(config.default_upstream.is_none());
        assert!(config.logging.log_dir.is_none());
    }

    #[test]
    fn test_flat_json_maps_onto_sections() {
        let flat: FlatJsonConfig = serde_json::from_str(
            r#"{
                "log_dir": "/var/log/gateway",
                "host": "127.0.0.1:8000",
                "backends": [
                    {"callback_prefix": "a", "host": "a:1"},
                    {"callback_prefix": "b", "host": "b:2"}
                ]
            }"#,
        )
        .unwrap();

        let config = GatewayConfig::from(flat);
        assert_eq!(config.listener.bind_address, "127.0.0.1:8000");
        assert_eq!(config.logging.log_dir.as_deref(), Some("/var/log/gateway"));
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.backends.len(), 2);
        assert_eq!(config.backends[1].callback_prefix, "b");
    }
}
