//! Process lifecycle.
//!
//! ```text
//! startup.rs   GatewayConfig → HttpServer (route table, forwarder, SPA service)
//!              → log routes → check static root → metrics → bind → serve
//! signals.rs   Ctrl-C / SIGTERM → Shutdown::trigger
//! shutdown.rs  broadcast to the server; in-flight requests finish, then exit
//! ```
//!
//! Configuration is fixed for the lifetime of the process.

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::StartupError;
