//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the route table and log the resolved configuration
//! - Start background pieces (metrics exporter, signal listener)
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)
//! - A missing static root is a warning, not an error

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::GatewayConfig;
use crate::http::static_files;
use crate::http::HttpServer;
use crate::lifecycle::{signals, Shutdown};
use crate::observability::metrics;
use crate::routing::{RouteTable, RouteTableError};

/// Errors that stop the gateway from starting or keep serving.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid route table: {0}")]
    Routes(#[from] RouteTableError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}

/// Log the configuration the gateway is about to serve with.
pub fn log_config(config: &GatewayConfig, routes: &RouteTable) {
    tracing::info!(
        bind_address = %config.listener.bind_address(),
        general_target = %config.backends.general,
        scheduling_target = %config.backends.scheduling,
        network_target = %config.backends.network,
        static_root = %config.static_files.root.display(),
        connect_timeout_secs = config.timeouts.connect_secs,
        upstream_timeout_secs = config.timeouts.upstream_secs,
        "Configuration loaded"
    );

    for (priority, rule) in routes.rules().iter().enumerate() {
        let rewrite = rule
            .rewrite()
            .map_or_else(|| "none".to_string(), ToString::to_string);
        tracing::info!(
            priority,
            route = rule.name(),
            prefix = rule.prefix(),
            target = %rule.target(),
            rewrite = %rewrite,
            extra_headers = rule.extra_headers().len(),
            "Route registered"
        );
    }
}

/// Start the gateway and serve until a termination signal arrives.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    let server = HttpServer::new(config)?;
    let config = server.config();

    log_config(config, server.routes());
    static_files::check_root(&config.static_files);

    if let Some(addr) = &config.observability.metrics_address {
        match addr.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(metrics_address = %addr, "Failed to parse metrics address"),
        }
    }

    let address = config.listener.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|source| StartupError::Bind {
            address: address.clone(),
            source,
        })?;

    let shutdown = Arc::new(Shutdown::new());
    let server_shutdown = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown);

    server.run(listener, server_shutdown).await.map_err(StartupError::Serve)
}
