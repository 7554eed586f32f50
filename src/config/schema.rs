//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so a TOML file can provide any subset of the
//! fields; environment variables are layered on top by the loader.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Credential injected for the general REST backend unless overridden.
pub const DEFAULT_GENERAL_AUTHORIZATION: &str = "Basic YWRtaW46YWRtaW4=";

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Base addresses of the three backend roles.
    pub backends: BackendTargets,

    /// Single-page application build output.
    pub static_files: StaticFilesConfig,

    /// Upstream timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Interface to bind (e.g. "0.0.0.0").
    pub host: String,

    /// TCP port to listen on.
    pub port: u16,
}

impl ListenerConfig {
    /// The `host:port` string handed to the TCP listener.
    pub fn bind_address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 80,
        }
    }
}

/// Base URLs of the backend roles the route table points at.
#[derive(Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BackendTargets {
    /// General/device-data REST backend.
    pub general: String,

    /// Scheduling and latest-value backend.
    pub scheduling: String,

    /// Network configuration backend.
    pub network: String,

    /// `Authorization` header value sent to the general backend.
    pub general_authorization: String,
}

impl Default for BackendTargets {
    fn default() -> Self {
        Self {
            general: "http://localhost:8888".to_string(),
            scheduling: "http://localhost:8081".to_string(),
            network: "http://host.docker.internal:5000".to_string(),
            general_authorization: DEFAULT_GENERAL_AUTHORIZATION.to_string(),
        }
    }
}

// The credential never reaches logs, even at debug level.
impl fmt::Debug for BackendTargets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendTargets")
            .field("general", &self.general)
            .field("scheduling", &self.scheduling)
            .field("network", &self.network)
            .field("general_authorization", &"<redacted>")
            .finish()
    }
}

/// Static asset configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StaticFilesConfig {
    /// Directory holding the built application.
    pub root: PathBuf,

    /// Document served for every path that is neither an API route nor a file.
    pub index: String,
}

impl StaticFilesConfig {
    /// Full path of the fallback document.
    pub fn index_path(&self) -> PathBuf {
        self.root.join(&self.index)
    }
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("dist/maxicom-bms/browser"),
            index: "index.html".to_string(),
        }
    }
}

/// Timeout configuration for upstream calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Time allowed for the backend to start answering, in seconds.
    pub upstream_secs: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn upstream(&self) -> Duration {
        Duration::from_secs(self.upstream_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            upstream_secs: 30,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error) used when `RUST_LOG` is unset.
    pub log_level: String,

    /// Prometheus exporter bind address; the exporter is off when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_address: None,
        }
    }
}
