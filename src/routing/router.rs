//! Route table lookup.
//!
//! # Responsibilities
//! - Store backend routes in configuration order
//! - Resolve a routing key to the first backend whose prefix equals it
//! - Return explicit no-match rather than a silent default
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) ordered scan: first match wins, not best match
//! - Equality on the normalized key, despite the field being called a prefix

use axum::http::uri::{Authority, InvalidUri};
use thiserror::Error;

use crate::config::BackendConfig;
use crate::routing::matcher::{normalize, RoutingKey};

/// Error building a route table from configuration.
#[derive(Debug, Error)]
#[error("backend {prefix:?} has invalid host {host:?}: {source}")]
pub struct RouteTableError {
    pub prefix: String,
    pub host: String,
    #[source]
    pub source: InvalidUri,
}

/// One configured backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendRoute {
    pub prefix: String,
    pub host: Authority,
}

/// Backend routes in configuration order.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<BackendRoute>,
}

impl RouteTable {
    pub fn new(routes: Vec<BackendRoute>) -> Self {
        Self { routes }
    }

    /// Build the table from configured backends, keeping their order.
    pub fn from_config(backends: &[BackendConfig]) -> Result<Self, RouteTableError> {
        let routes = backends
            .iter()
            .map(|backend| {
                let host = backend.host.parse::<Authority>().map_err(|source| RouteTableError {
                    prefix: backend.callback_prefix.clone(),
                    host: backend.host.clone(),
                    source,
                })?;
                Ok(BackendRoute {
                    prefix: backend.callback_prefix.clone(),
                    host,
                })
            })
            .collect::<Result<Vec<_>, RouteTableError>>()?;

        Ok(Self { routes })
    }

    /// First route whose prefix equals the key's normalized form.
    pub fn resolve(&self, key: &RoutingKey) -> Option<&BackendRoute> {
        self.lookup(key.normalized())
    }

    fn lookup(&self, normalized: &str) -> Option<&BackendRoute> {
        if normalized.is_empty() {
            return None;
        }
        self.routes.iter().find(|route| route.prefix == normalized)
    }

    pub fn routes(&self) -> &[BackendRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Resolve a raw callback identifier to a backend host.
pub fn resolve<'a>(raw: &str, table: &'a RouteTable) -> Option<&'a Authority> {
    table.lookup(normalize(raw)).map(|route| &route.host)
}
