//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define gateway metrics (requests, latency) per route
//! - Expose Prometheus-compatible metrics endpoint when configured
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, method, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//!
//! # Design Decisions
//! - Without an installed recorder the macros are no-ops
//! - Static and SPA responses are recorded under the `static` route label

use axum::http::{Method, StatusCode};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Route label used for requests answered by the static collaborator.
pub const STATIC_ROUTE: &str = "static";

/// Install the Prometheus recorder and its HTTP listener on `addr`.
///
/// Must run inside the Tokio runtime. Failure is logged, not fatal.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request.
pub fn record_request(route: &str, method: &Method, status: StatusCode, start: Instant) {
    metrics::counter!(
        "gateway_requests_total",
        "route" => route.to_string(),
        "method" => method.to_string(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);

    metrics::histogram!(
        "gateway_request_duration_seconds",
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}
