//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber (stdout, optional `app.log`)
//! - Record one event per callback with its payload and routing outcome
//!
//! # Design Decisions
//! - `app.log` is opened append-only at startup; failing to open it is fatal
//! - File output goes through a non-blocking writer so a slow or failing
//!   sink never holds up a forward (lines are dropped instead)
//! - Log level from config, overridable with `RUST_LOG`

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;
use crate::http::RequestId;
use crate::routing::{PassthroughReason, RouteDecision, RouteTarget};

/// Name of the log file inside `log_dir`.
pub const LOG_FILE_NAME: &str = "app.log";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to open log file {}: {source}", .path.display())]
    OpenLogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to install log subscriber: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Keeps the file writer flushing; drop it only at shutdown.
#[must_use]
pub struct LoggingGuard {
    _file: Option<WorkerGuard>,
}

/// Install the global subscriber.
pub fn init_logging(config: &LoggingConfig) -> Result<LoggingGuard, LoggingError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(&config.level).into());

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let file = open_log_file(Path::new(dir))?;
            let (writer, guard) = tracing_appender::non_blocking(file);
            let layer = fmt::layer().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(file_layer)
        .try_init()?;

    Ok(LoggingGuard { _file: guard })
}

fn default_filter(level: &str) -> String {
    format!("callback_gateway={level},tower_http={level}")
}

/// Open `<dir>/app.log` for appending, creating it if needed.
pub fn open_log_file(dir: &Path) -> Result<File, LoggingError> {
    let path = dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|source| LoggingError::OpenLogFile { path, source })
}

/// Record the routing outcome of one callback.
///
/// Logs the payload JSON, or the raw form body when no payload was found.
pub fn log_route_decision(request_id: &RequestId, decision: &RouteDecision, body: &[u8]) {
    let payload: Cow<'_, str> = match &decision.payload {
        Some(payload) => Cow::Borrowed(payload.as_str()),
        None => String::from_utf8_lossy(body),
    };

    match &decision.target {
        RouteTarget::Backend(host) => {
            tracing::info!(
                request_id = %request_id,
                payload = %payload,
                routing_key = %decision.key.raw(),
                backend = %host,
                "Callback routed to backend"
            );
        }
        RouteTarget::Passthrough(reason) => {
            tracing::info!(
                request_id = %request_id,
                payload = %payload,
                routing_key = %decision.key.raw(),
                outcome = reason.label(),
                "Callback passed through"
            );
            if let PassthroughReason::Decode(e) = reason {
                tracing::warn!(
                    request_id = %request_id,
                    error = %e,
                    "Failed fetching callback id"
                );
            }
        }
    }
}
