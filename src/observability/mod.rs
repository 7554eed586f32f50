//! Observability subsystem.
//!
//! ```text
//! dispatch ─┬─▶ logging.rs   one span per request (method, uri, request id),
//!           │                "Proxying request" / "Upstream error" events
//!           └─▶ metrics.rs   gateway_requests_total, gateway_request_duration_seconds
//!                            labelled by route name or `static`
//! ```
//!
//! Logs go to stdout. The Prometheus listener only starts when
//! `METRICS_ADDRESS` is set.

pub mod logging;
pub mod metrics;
