//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_upstream_requests_total` (counter): upstream calls by service, method, status
//! - `gateway_upstream_duration_seconds` (histogram): upstream latency
//! - `gateway_auth_failures_total` (counter): rejected requests by reason
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests need no setup.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

pub const UPSTREAM_REQUESTS_TOTAL: &str = "gateway_upstream_requests_total";
pub const UPSTREAM_DURATION_SECONDS: &str = "gateway_upstream_duration_seconds";
pub const AUTH_FAILURES_TOTAL: &str = "gateway_auth_failures_total";

/// Install the Prometheus recorder and its HTTP listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one upstream call. `outcome` is the status code or `unavailable`.
pub fn record_upstream(service: &str, method: &'static str, outcome: &str, start_time: Instant) {
    let labels = [
        ("service", service.to_string()),
        ("method", method.to_string()),
        ("status", outcome.to_string()),
    ];
    counter!(UPSTREAM_REQUESTS_TOTAL, &labels[..]).increment(1);
    histogram!(UPSTREAM_DURATION_SECONDS, &labels[..]).record(start_time.elapsed().as_secs_f64());
}

pub fn record_auth_failure(reason: &'static str) {
    counter!(AUTH_FAILURES_TOTAL, "reason" => reason).increment(1);
}
