//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the dispatch handler
//! - Wire up middleware (request ID, tracing)
//! - Bind server to listener, stop on the shutdown broadcast
//! - Dispatch requests: API rule match → forwarder, otherwise → static/SPA
//! - Observability (metrics, correlation IDs)

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::forward::Forwarder;
use crate::http::request::{make_span, X_REQUEST_ID};
use crate::http::static_files::{self, SpaService};
use crate::observability::metrics;
use crate::routing::{RouteTable, RouteTableError};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<RouteTable>,
    pub forwarder: Forwarder,
    pub spa: SpaService,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
    routes: Arc<RouteTable>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, RouteTableError> {
        let routes = Arc::new(RouteTable::from_config(&config)?);

        let state = AppState {
            routes: routes.clone(),
            forwarder: Forwarder::new(&config.timeouts),
            spa: static_files::spa_service(&config.static_files),
        };

        let router = Self::build_router(state);
        Ok(Self {
            router,
            config,
            routes,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/", any(dispatch))
            .route("/{*path}", any(dispatch))
            .with_state(state)
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http().make_span_with(make_span))
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
    }

    /// Run the server until `shutdown` fires, then drain in-flight requests.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.routes.len(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The service without a listener, for in-process use.
    pub fn into_router(self) -> Router {
        self.router
    }
}

/// Main handler.
/// Matches the route table in order; unmatched paths go to the static collaborator.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    let Some(route) = state.routes.match_path(&path) else {
        let response = static_files::serve(state.spa.clone(), request).await;
        metrics::record_request(metrics::STATIC_ROUTE, &method, response.status(), start);
        return response;
    };

    tracing::info!(
        method = %method,
        path = %path,
        route = route.rule.name(),
        target = %route.rule.target(),
        forwarded_path = %route.forwarded_path(),
        "Proxying request"
    );

    let response = match state.forwarder.forward(&route, request).await {
        Ok(response) => {
            tracing::debug!(
                route = route.rule.name(),
                status = %response.status(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream responded"
            );
            response
        }
        Err(e) => {
            tracing::warn!(
                method = %method,
                path = %path,
                route = route.rule.name(),
                target = %route.rule.target(),
                error = %e,
                "Upstream error"
            );
            e.into_response()
        }
    };

    metrics::record_request(route.rule.name(), &method, response.status(), start);
    response
}
