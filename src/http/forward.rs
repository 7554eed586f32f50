//! Request forwarding to backend services.
//!
//! # Responsibilities
//! - Re-target the inbound request at the matched rule's backend
//! - Rewrite `Host` to the backend authority (change-origin)
//! - Merge the rule's extra headers over the client's
//! - Stream the body both ways; one upstream deadline covers headers and body
//!
//! # Design Decisions
//! - One pooled client shared by all routes (keep-alive per backend)
//! - No retries: a failed call becomes 502, a slow one 504
//! - Dropping the handler future (client gone) drops the upstream call

use axum::body::Body;
use axum::http::{header, Request, Response, Version};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::time::Duration;

use crate::config::TimeoutConfig;
use crate::http::headers::strip_hop_by_hop;
use crate::http::response::{self, ProxyError};
use crate::resilience::timeouts::Deadline;
use crate::routing::RouteMatch;

/// Sends matched requests to their backend.
#[derive(Clone)]
pub struct Forwarder {
    client: Client<HttpConnector, Body>,
    upstream_timeout: Duration,
}

impl Forwarder {
    pub fn new(timeouts: &TimeoutConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeouts.connect()));
        connector.set_nodelay(true);

        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            client,
            upstream_timeout: timeouts.upstream(),
        }
    }

    pub fn upstream_timeout(&self) -> Duration {
        self.upstream_timeout
    }

    /// Forward `request` according to `route` and return the backend's response.
    pub async fn forward(
        &self,
        route: &RouteMatch<'_>,
        request: Request<Body>,
    ) -> Result<Response<Body>, ProxyError> {
        let upstream = build_upstream_request(route, request)?;

        tracing::info!(
            method = %upstream.method(),
            route = route.rule.name(),
            upstream = %upstream.uri(),
            "Forwarding request"
        );

        let deadline = Deadline::after(self.upstream_timeout);
        let response = deadline.run(self.client.request(upstream)).await?;
        Ok(response::from_upstream(response).map(|body| deadline.bound_body(body)))
    }
}

/// Build the request sent to the backend for `route`.
pub fn build_upstream_request(
    route: &RouteMatch<'_>,
    request: Request<Body>,
) -> Result<Request<Body>, ProxyError> {
    let (mut parts, body) = request.into_parts();
    let rule = route.rule;

    parts.uri = route.upstream_uri(parts.uri.query())?;
    // The backend connection is HTTP/1.1 whatever the client spoke.
    parts.version = Version::HTTP_11;

    strip_hop_by_hop(&mut parts.headers);
    if rule.change_origin() {
        parts.headers.insert(header::HOST, rule.target().host_header().clone());
    }
    for (name, value) in rule.extra_headers() {
        parts.headers.insert(name.clone(), value.clone());
    }

    Ok(Request::from_parts(parts, body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::routing::{RouteRule, RouteTable, UpstreamTarget};
    use axum::http::{HeaderValue, Method};

    fn table() -> RouteTable {
        let mut config = GatewayConfig::default();
        config.backends.general = "http://general:8888".into();
        config.backends.scheduling = "http://scheduling:8081".into();
        RouteTable::from_config(&config).unwrap()
    }

    #[test]
    fn test_general_request_gets_credential_and_host() {
        let table = table();
        let request = Request::builder()
            .method(Method::POST)
            .uri("http://gateway.local/api/devices/5?verbose=1")
            .header(header::HOST, "gateway.local")
            .header(header::AUTHORIZATION, "Bearer client-token")
            .header(header::CONNECTION, "keep-alive")
            .header("x-request-id", "req-1")
            .body(Body::from("payload"))
            .unwrap();

        let path = request.uri().path().to_owned();
        let route = table.match_path(&path).unwrap();
        let upstream = build_upstream_request(&route, request).unwrap();

        assert_eq!(upstream.method(), Method::POST);
        assert_eq!(upstream.uri(), "http://general:8888/rest/devices/5?verbose=1");
        assert_eq!(upstream.headers()[header::HOST], "general:8888");
        assert_eq!(upstream.headers()[header::AUTHORIZATION], "Basic YWRtaW46YWRtaW4=");
        assert_eq!(upstream.headers()["x-request-id"], "req-1");
        assert!(!upstream.headers().contains_key(header::CONNECTION));
    }

    #[test]
    fn test_schedule_request_keeps_client_authorization() {
        let table = table();
        let request = Request::builder()
            .uri("/api/schedule/42")
            .header(header::AUTHORIZATION, "Bearer client-token")
            .version(Version::HTTP_2)
            .body(Body::empty())
            .unwrap();

        let route = table.match_path("/api/schedule/42").unwrap();
        let upstream = build_upstream_request(&route, request).unwrap();

        assert_eq!(upstream.uri(), "http://scheduling:8081/soh-schedule/42");
        assert_eq!(upstream.version(), Version::HTTP_11);
        assert_eq!(upstream.headers()[header::HOST], "scheduling:8081");
        assert_eq!(upstream.headers()[header::AUTHORIZATION], "Bearer client-token");
    }

    #[test]
    fn test_keep_host_leaves_client_host() {
        let target = UpstreamTarget::parse("http://backend:9000").unwrap();
        let table = RouteTable::new(vec![RouteRule::new("legacy", "/legacy", target)
            .keep_host()
            .with_header(header::HeaderName::from_static("x-gateway"), HeaderValue::from_static("bms"))])
        .unwrap();
        let request = Request::builder()
            .uri("/legacy/a")
            .header(header::HOST, "gateway.local")
            .body(Body::empty())
            .unwrap();

        let route = table.match_path("/legacy/a").unwrap();
        let upstream = build_upstream_request(&route, request).unwrap();

        assert_eq!(upstream.uri(), "http://backend:9000/a");
        assert_eq!(upstream.headers()[header::HOST], "gateway.local");
        assert_eq!(upstream.headers()["x-gateway"], "bms");
    }

    #[test]
    fn test_timeout_from_config() {
        let timeouts = TimeoutConfig { connect_secs: 1, upstream_secs: 7 };
        assert_eq!(Forwarder::new(&timeouts).upstream_timeout(), Duration::from_secs(7));
    }
}
