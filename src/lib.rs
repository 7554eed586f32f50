//! BMS edge gateway library.
//!
//! Serves the single-page application build and routes `/api/...` traffic
//! to the backend services through an ordered prefix table.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
