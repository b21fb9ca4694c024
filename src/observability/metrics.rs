//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): caller responses by method, status
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_upstream_attempts_total` (counter): upstream calls by outcome
//! - `proxy_retries_total` (counter): attempts beyond the first
//! - `proxy_rejected_total` (counter): terminal failures by reason
//!
//! Recording is a no-op until a recorder is installed, so unit tests and
//! metrics-disabled deployments pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with an HTTP scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;

    describe_counter!("proxy_requests_total", "Responses returned to callers");
    describe_histogram!(
        "proxy_request_duration_seconds",
        "End-to-end request latency in seconds"
    );
    describe_counter!("proxy_upstream_attempts_total", "Upstream calls by outcome");
    describe_counter!("proxy_retries_total", "Upstream attempts beyond the first");
    describe_counter!("proxy_rejected_total", "Requests ending in a proxy-generated failure");

    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a finished caller-facing response.
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("proxy_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one upstream call; `outcome` is "success" or "transport_error".
pub fn record_upstream_attempt(outcome: &'static str) {
    counter!("proxy_upstream_attempts_total", "outcome" => outcome).increment(1);
}

pub fn record_retry() {
    counter!("proxy_retries_total").increment(1);
}

pub fn record_rejected(reason: &'static str) {
    counter!("proxy_rejected_total", "reason" => reason).increment(1);
}
