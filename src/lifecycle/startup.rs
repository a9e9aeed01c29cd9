//! Startup orchestration.
//!
//! # Responsibilities
//! - Locate, load and validate configuration
//! - Initialize logging and metrics
//! - Build the gateway, bind the listener and serve until a signal
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::path::Path;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::validation::duplicate_prefixes;
use crate::config::{load_config, locate_config, ConfigError};
use crate::http::{GatewayServer, ServerError};
use crate::lifecycle::{wait_for_signal, Shutdown};
use crate::observability::{init_logging, metrics, LoggingError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("logging error: {0}")]
    Logging(#[from] LoggingError),

    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("metrics exporter error: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("gateway setup error: {0}")]
    Server(#[from] ServerError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Run the gateway from a config file or directory until shutdown.
pub async fn start(config_path: &Path) -> Result<(), StartupError> {
    let path = locate_config(config_path)?;
    let config = load_config(&path)?;
    let _logging = init_logging(&config.logging)?;

    tracing::info!(
        config = %path.display(),
        bind_address = %config.listener.bind_address,
        backends = config.backends.len(),
        default_upstream = ?config.default_upstream,
        "Configuration loaded"
    );
    for prefix in duplicate_prefixes(&config) {
        tracing::warn!(
            prefix = %prefix,
            "Callback prefix configured more than once; only the first backend is used"
        );
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(addr)?;
    }

    let bind_address = config.listener.bind_address.clone();
    let server = GatewayServer::new(config)?;

    let listener = TcpListener::bind(&bind_address)
        .await
        .map_err(|source| StartupError::Bind {
            address: bind_address.clone(),
            source,
        })?;
    tracing::info!(address = %bind_address, "Starting gateway server");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.listener();
    tokio::spawn(async move {
        wait_for_signal().await;
        shutdown.trigger();
    });

    server
        .run(listener, server_shutdown)
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("Shutdown complete");
    Ok(())
}
