//! Request identification.
//!
//! # Responsibilities
//! - Give every inbound request an `x-request-id` (UUID v4) unless it has one
//! - Carry the id to the backend (it is an ordinary request header) and back
//!   to the client on the response
//! - Attach it to the per-request tracing span
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Client-supplied ids are kept so traces join across hops

use axum::body::Body;
use axum::http::{HeaderName, Request};
use tracing::Span;

pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request id of `request`, or `-` when none was assigned.
pub fn request_id<B>(request: &Request<B>) -> &str {
    request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-")
}

/// Span for `TraceLayer`, tagged with the request id.
pub fn make_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_id_lookup() {
        let request = Request::builder()
            .header("x-request-id", "abc-123")
            .body(())
            .unwrap();
        assert_eq!(request_id(&request), "abc-123");

        let request = Request::builder().body(()).unwrap();
        assert_eq!(request_id(&request), "-");
    }
}
