//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses (listener, backends, default upstream, metrics)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Report duplicate callback prefixes
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Duplicate prefixes are legal (first wins); they are reported, not rejected

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::uri::Authority;
use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    #[error("backend #{index} has an empty callback_prefix")]
    EmptyPrefix { index: usize },

    #[error("backend {prefix:?} has invalid host {host:?}")]
    InvalidBackendHost { prefix: String, host: String },

    #[error("invalid default_upstream {0:?}")]
    InvalidDefaultUpstream(String),

    #[error("invalid metrics address {0:?}")]
    InvalidMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("limits.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a loaded configuration before the gateway accepts it.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    for (index, backend) in config.backends.iter().enumerate() {
        if backend.callback_prefix.is_empty() {
            errors.push(ValidationError::EmptyPrefix { index });
        }
        if !is_authority(&backend.host) {
            errors.push(ValidationError::InvalidBackendHost {
                prefix: backend.callback_prefix.clone(),
                host: backend.host.clone(),
            });
        }
    }

    if let Some(upstream) = &config.default_upstream {
        if !is_authority(upstream) {
            errors.push(ValidationError::InvalidDefaultUpstream(upstream.clone()));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Prefixes configured more than once. Only the first entry is ever selected.
pub fn duplicate_prefixes(config: &GatewayConfig) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut duplicates = Vec::new();
    for backend in &config.backends {
        let prefix = backend.callback_prefix.as_str();
        if !seen.insert(prefix) && !duplicates.contains(&prefix) {
            duplicates.push(prefix);
        }
    }
    duplicates
}

fn is_authority(host: &str) -> bool {
    !host.is_empty() && host.parse::<Authority>().is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::BackendConfig;

    fn valid_config() -> GatewayConfig {
        let mut config = GatewayConfig::default();
        config.backends.push(BackendConfig::new("approve_req", "b1:9001"));
        config
    }

    #[test]
    fn test_valid_config_passes() {
        assert_eq!(validate_config(&valid_config()), Ok(()));
    }

    #[test]
    fn test_reports_every_error() {
        let mut config = valid_config();
        config.listener.bind_address = "not an address".into();
        config.backends.push(BackendConfig::new("", "b2:9002"));
        config.backends.push(BackendConfig::new("deny", "bad host/"));
        config.default_upstream = Some(String::new());
        config.observability.metrics_enabled = true;
        config.observability.metrics_address = "localhost".into();
        config.timeouts.request_secs = 0;
        config.limits.max_body_size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::InvalidBindAddress("not an address".into()),
                ValidationError::EmptyPrefix { index: 1 },
                ValidationError::InvalidBackendHost {
                    prefix: "deny".into(),
                    host: "bad host/".into(),
                },
                ValidationError::InvalidDefaultUpstream(String::new()),
                ValidationError::InvalidMetricsAddress("localhost".into()),
                ValidationError::ZeroRequestTimeout,
                ValidationError::ZeroBodyLimit,
            ]
        );
    }

    #[test]
    fn test_duplicate_prefixes_are_reported_once() {
        let mut config = valid_config();
        config.backends.push(BackendConfig::new("approve_req", "b2:9002"));
        config.backends.push(BackendConfig::new("approve_req", "b3:9003"));
        config.backends.push(BackendConfig::new("deny", "b4:9004"));

        assert_eq!(duplicate_prefixes(&config), vec!["approve_req"]);
        assert!(validate_config(&config).is_ok());
    }
}
