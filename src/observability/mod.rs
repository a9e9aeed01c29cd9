//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request pipeline produces:
//!     → logging.rs (one structured event per callback, stdout + app.log)
//!     → metrics.rs (routing outcome and upstream counters)
//!
//! Consumers:
//!     → Log files / stdout collectors
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields (request_id, routing_key, outcome) for machine parsing
//! - Observability never blocks or fails a forward

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, log_route_decision, LoggingError, LoggingGuard};
