//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, body buffering)
//!     → request.rs (request id for correlation)
//!     → [routing decides backend from the body]
//!     → rewrite.rs (retarget URI, resend the same bytes)
//!     → forward to backend or default upstream
//! ```

pub mod request;
pub mod rewrite;
pub mod server;

pub use request::{RequestId, X_REQUEST_ID};
pub use rewrite::{passthrough_uri, retarget_uri, rewrite_request};
pub use server::{AppState, GatewayServer, ServerError};
