//! BMS edge gateway.
//!
//! Serves the building-management web application and fronts its APIs.
//!
//! # Architecture Overview
//!
//! ```text
//!                          ┌──────────────────────────────────────────────────┐
//!                          │                    GATEWAY                        │
//!     Client Request       │  ┌─────────┐    ┌──────────────┐                 │
//!     ─────────────────────┼─▶│  http   │───▶│   routing    │                 │
//!                          │  │ server  │    │ ordered table│                 │
//!                          │  └─────────┘    └──────┬───────┘                 │
//!                          │            match │            │ no match         │
//!                          │                  ▼            ▼                  │
//!                          │          ┌────────────┐  ┌─────────────┐         │
//!                          │          │ forwarder  │  │ static/SPA  │         │
//!                          │          │ (rewrite,  │  │  fallback   │         │
//!                          │          │ Host, auth)│  └─────────────┘         │
//!                          │          └─────┬──────┘                          │
//!                          └────────────────┼─────────────────────────────────┘
//!                                           ▼
//!                     network (:5000)   scheduling (:8081)   general REST (:8888)
//! ```
//!
//! Configuration comes from the environment (`PORT`, `API_TARGET_8081`,
//! `API_TARGET_8888`, `API_TARGET_NETWORK`, ...), optionally seeded from the
//! TOML file named by `GATEWAY_CONFIG`.

use bms_gateway::config;
use bms_gateway::lifecycle::startup;
use bms_gateway::observability::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match config::from_env() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };

    logging::init(&config.observability.log_level);

    tracing::info!("bms-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
