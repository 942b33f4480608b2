//! Metrics collection and exposition.
//!
//! # Metrics
//! - `mediator_requests_total` (counter): requests by method, status, backend
//! - `mediator_request_duration_seconds` (histogram): end-to-end latency
//! - `mediator_backend_errors_total` (counter): failed backend exchanges by kind
//!
//! Recording is a no-op until a recorder is installed, so the hot path
//! never checks whether metrics are enabled.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, backend: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("backend", backend.to_string()),
    ];
    metrics::counter!("mediator_requests_total", &labels).increment(1);
    metrics::histogram!("mediator_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

/// Record a failed backend exchange; `kind` is `connect`, `timeout` or `upstream`.
pub fn record_backend_error(backend: &str, kind: &'static str) {
    metrics::counter!(
        "mediator_backend_errors_total",
        "backend" => backend.to_string(),
        "kind" => kind
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder_is_noop() {
        record_request("GET", 200, "orders", Instant::now());
        record_backend_error("orders", "connect");
    }
}
