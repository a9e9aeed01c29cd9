//! Routing key normalization.
//!
//! # Responsibilities
//! - Hold the raw callback identifier taken from a payload
//! - Strip the per-invocation instance suffix (`__` onward)
//!
//! # Design Decisions
//! - Strip from the FIRST `__`, so `a__b__c` normalizes to `a`
//! - No regex; a single substring search

/// Separator between a handler's stable name and its instance suffix.
pub const INSTANCE_SUFFIX_MARKER: &str = "__";

/// Strip everything from the first [`INSTANCE_SUFFIX_MARKER`] onward.
pub fn normalize(raw: &str) -> &str {
    match raw.find(INSTANCE_SUFFIX_MARKER) {
        Some(at) => &raw[..at],
        None => raw,
    }
}

/// A callback identifier and its suffix-stripped form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoutingKey {
    raw: String,
    normalized_len: usize,
}

impl RoutingKey {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let normalized_len = normalize(&raw).len();
        Self { raw, normalized_len }
    }

    /// The identifier as it appeared in the payload.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The identifier with its instance suffix removed.
    pub fn normalized(&self) -> &str {
        &self.raw[..self.normalized_len]
    }

    /// True when extraction produced nothing to route on.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}
