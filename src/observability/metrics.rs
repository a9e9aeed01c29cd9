//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_callbacks_total` (counter): callbacks by routing outcome
//! - `gateway_upstream_requests_total` (counter): forwards by response status
//! - `gateway_upstream_duration_seconds` (histogram): forward latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Count one routing decision (`matched`, `no_backend`, ...).
pub fn record_callback(outcome: &'static str) {
    counter!("gateway_callbacks_total", "outcome" => outcome).increment(1);
}

/// Count one forward and its latency. Gateway-generated errors count too.
pub fn record_upstream(status: u16, start_time: Instant) {
    counter!("gateway_upstream_requests_total", "status" => status.to_string()).increment(1);
    histogram!("gateway_upstream_duration_seconds").record(start_time.elapsed().as_secs_f64());
}
