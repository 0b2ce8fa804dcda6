//! Metrics collection and exposition.
//!
//! # Metrics
//! - `imgxform_requests_total` (counter): completed requests by method
//!   and status
//! - `imgxform_request_duration_seconds` (histogram): latency
//!   distribution
//! - `imgxform_accept_faults_total` (counter): accept-loop errors that
//!   were swallowed to keep the server alive

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`. Failure to install is
/// logged, not fatal: the server serves without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one completed request.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "imgxform_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("imgxform_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Count a fault swallowed by the accept loop.
pub fn record_accept_fault() {
    counter!("imgxform_accept_faults_total").increment(1);
}
