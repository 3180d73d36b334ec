//! Metrics collection and exposition.
//!
//! # Metrics
//! - `container_requests_total` (counter): dispatched requests by path, status
//! - `container_request_duration_seconds` (histogram): dispatch latency

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
///
/// Failure to install is logged, not fatal; the container serves without
/// metrics in that case.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "metrics exporter listening"),
        Err(error) => {
            tracing::error!(error = %error, "failed to install metrics exporter");
        }
    }
}

/// Record one dispatch outcome.
pub fn record_dispatch(path: &str, status: u16, start: Instant) {
    counter!(
        "container_requests_total",
        "path" => path.to_owned(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "container_request_duration_seconds",
        "path" => path.to_owned()
    )
    .record(start.elapsed().as_secs_f64());
}
