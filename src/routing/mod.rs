//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Buffered callback body
//!     → payload::decode (routing key, possibly empty)
//!     → matcher.rs (strip instance suffix)
//!     → router.rs (ordered route table lookup)
//!     → Return: RouteDecision::Matched or RouteDecision::Passthrough
//!
//! Route Compilation (at startup):
//!     BackendConfig[]
//!     → parse hosts as authorities
//!     → Freeze as immutable RouteTable, shared via Arc
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same body always yields the same decision
//! - First match wins (configuration order)
//! - Every failure is a passthrough reason, never a rejection

pub mod matcher;
pub mod router;

use std::fmt;

use axum::http::uri::Authority;

use crate::payload::{self, DecodeError};

pub use matcher::{normalize, RoutingKey, INSTANCE_SUFFIX_MARKER};
pub use router::{resolve, BackendRoute, RouteTable, RouteTableError};

/// Why a callback is forwarded to its original destination.
#[derive(Debug)]
pub enum PassthroughReason {
    /// The body could not be decoded into a callback payload.
    Decode(DecodeError),
    /// The payload decoded, but carries no routing key for its type.
    NoRoutingKey { type_tag: String },
    /// The routing key matched no configured backend.
    NoBackendMatch,
}

impl PassthroughReason {
    /// Short label used for log fields and metrics.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Decode(_) => "decode_error",
            Self::NoRoutingKey { .. } => "no_routing_key",
            Self::NoBackendMatch => "no_backend",
        }
    }
}

impl fmt::Display for PassthroughReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decode(e) => write!(f, "failed to decode callback: {}", e),
            Self::NoRoutingKey { type_tag } => {
                write!(f, "no routing key for callback type {:?}", type_tag)
            }
            Self::NoBackendMatch => write!(f, "no backend configured for routing key"),
        }
    }
}

/// Outcome of routing one callback body.
#[derive(Debug)]
pub struct RouteDecision {
    /// The decoded payload JSON text, when a payload field was found.
    pub payload: Option<String>,
    /// The extracted routing key (empty when none could be extracted).
    pub key: RoutingKey,
    pub target: RouteTarget,
}

#[derive(Debug)]
pub enum RouteTarget {
    Backend(Authority),
    Passthrough(PassthroughReason),
}

impl RouteDecision {
    /// The backend to rewrite the request to, if one matched.
    pub fn backend(&self) -> Option<&Authority> {
        match &self.target {
            RouteTarget::Backend(host) => Some(host),
            RouteTarget::Passthrough(_) => None,
        }
    }

    /// `matched` or the passthrough reason label.
    pub fn outcome(&self) -> &'static str {
        match &self.target {
            RouteTarget::Backend(_) => "matched",
            RouteTarget::Passthrough(reason) => reason.label(),
        }
    }
}

/// Decide where a callback body goes. Pure; never fails.
pub fn route_callback(body: &[u8], table: &RouteTable) -> RouteDecision {
    let decoded = match payload::decode(body) {
        Ok(decoded) => decoded,
        Err(e) => {
            return RouteDecision {
                payload: None,
                key: RoutingKey::default(),
                target: RouteTarget::Passthrough(PassthroughReason::Decode(e)),
            };
        }
    };

    let key = decoded.routing_key();
    let target = if key.is_empty() {
        RouteTarget::Passthrough(PassthroughReason::NoRoutingKey {
            type_tag: decoded.callback.type_tag().to_string(),
        })
    } else {
        match table.resolve(&key) {
            Some(route) => RouteTarget::Backend(route.host.clone()),
            None => RouteTarget::Passthrough(PassthroughReason::NoBackendMatch),
        }
    };

    RouteDecision {
        payload: Some(decoded.payload),
        key,
        target,
    }
}
