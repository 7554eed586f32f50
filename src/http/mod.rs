//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request id + trace layers)
//!     → [routing::RouteTable decides: API rule or no match]
//!     → forward.rs (re-target, Host + extra headers, deadline)   on match
//!     → static_files.rs (asset or SPA index)                     on no match
//!     → response.rs (hop-by-hop cleanup, gateway errors)
//!     → Send to client
//! ```

pub mod forward;
pub mod headers;
pub mod request;
pub mod response;
pub mod server;
pub mod static_files;

pub use forward::Forwarder;
pub use request::X_REQUEST_ID;
pub use response::ProxyError;
pub use server::HttpServer;
