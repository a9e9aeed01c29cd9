//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config dir or file (TOML/JSON)
//!     → loader.rs (locate, parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → RouteTable built once, shared via Arc with every request
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All sections have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Any load or validation failure is fatal at startup

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, locate_config, ConfigError};
pub use schema::{
    BackendConfig, GatewayConfig, LimitsConfig, ListenerConfig, LoggingConfig,
    ObservabilityConfig, TimeoutConfig,
};
