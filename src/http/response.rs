//! Response handling and transformation.
//!
//! # Responsibilities
//! - Hand backend responses to the client unchanged apart from hop-by-hop headers
//! - Map backend failures to gateway status codes
//!
//! # Design Decisions
//! - Streaming responses avoid buffering entire body
//! - Unreachable backends result in 502 Bad Gateway
//! - Backend timeouts result in 504 Gateway Timeout

use axum::body::Body;
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use hyper::body::Incoming;
use std::time::Duration;

use crate::http::headers::strip_hop_by_hop;

/// Failures while forwarding a request to a backend.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    /// Connection refused, reset, DNS failure or an unparseable response.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] hyper_util::client::legacy::Error),

    /// The backend missed the deadline, before the headers or while streaming the body.
    #[error("upstream exceeded its {0:?} deadline")]
    Timeout(Duration),

    /// The rewritten path could not form a valid URI.
    #[error("invalid upstream request: {0}")]
    InvalidRequest(#[from] axum::http::Error),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ProxyError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ProxyError::InvalidRequest(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> axum::response::Response {
        let message = match self {
            ProxyError::Upstream(_) => "Upstream request failed",
            ProxyError::Timeout(_) => "Upstream request timed out",
            ProxyError::InvalidRequest(_) => "Could not build upstream request",
        };
        (self.status(), message).into_response()
    }
}

/// Convert a backend response into the response sent to the client.
pub fn from_upstream(response: Response<Incoming>) -> Response<Body> {
    let (mut parts, body) = response.into_parts();
    strip_hop_by_hop(&mut parts.headers);
    Response::from_parts(parts, Body::new(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_maps_to_gateway_timeout() {
        let err = ProxyError::Timeout(Duration::from_secs(30));
        assert_eq!(err.status(), StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(err.into_response().status(), StatusCode::GATEWAY_TIMEOUT);
    }

    #[test]
    fn test_invalid_request_is_internal_error() {
        let err = axum::http::Uri::builder()
            .path_and_query("not a path")
            .build()
            .unwrap_err();
        let err = ProxyError::from(err);
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
