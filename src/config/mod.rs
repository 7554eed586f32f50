//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → loader.rs (optional TOML file from GATEWAY_CONFIG)
//!     → loader.rs (environment overrides: PORT, API_TARGET_*, ...)
//!     → validation.rs (semantic checks)
//!     → GatewayConfig (validated, immutable)
//!     → route table + forwarder built once at startup
//! ```
//!
//! # Design Decisions
//! - Config is read once; nothing is reloaded while serving
//! - All fields have defaults so an empty environment is a working setup
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_env, load_config, ConfigError};
pub use schema::{
    BackendTargets, GatewayConfig, ListenerConfig, ObservabilityConfig, StaticFilesConfig,
    TimeoutConfig,
};
pub use validation::ValidationError;
