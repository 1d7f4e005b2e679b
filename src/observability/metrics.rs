//! Metrics collection and exposition.
//!
//! # Metrics
//! - `merger_requests_total` (counter): served requests by status
//! - `merger_request_duration_seconds` (histogram): latency distribution
//! - `merger_subscription_fetches_total` (counter): upstream fetches by outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus exporter only runs when enabled in config

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(status: u16, start: Instant) {
    metrics::counter!("merger_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("merger_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_fetch(success: bool) {
    let outcome = if success { "success" } else { "failure" };
    metrics::counter!("merger_subscription_fetches_total", "outcome" => outcome).increment(1);
}
