//! Callback gateway library.
//!
//! Routes webhook callbacks from a messaging platform to backend services
//! by the callback identifier carried inside the form-encoded payload.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod payload;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::GatewayServer;
pub use lifecycle::{Shutdown, ShutdownListener};
