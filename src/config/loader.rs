//! Configuration loading from disk and the process environment.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file named by
//! `GATEWAY_CONFIG`, individual environment variables. Empty variables count
//! as unset.

use std::fmt::Display;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_CONFIG_FILE: &str = "GATEWAY_CONFIG";
pub const ENV_PORT: &str = "PORT";
pub const ENV_BIND_HOST: &str = "BIND_HOST";
pub const ENV_TARGET_GENERAL: &str = "API_TARGET_8888";
pub const ENV_TARGET_SCHEDULING: &str = "API_TARGET_8081";
pub const ENV_TARGET_NETWORK: &str = "API_TARGET_NETWORK";
pub const ENV_AUTHORIZATION: &str = "API_AUTHORIZATION";
pub const ENV_STATIC_ROOT: &str = "STATIC_ROOT";
pub const ENV_UPSTREAM_TIMEOUT: &str = "UPSTREAM_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT: &str = "CONNECT_TIMEOUT_SECS";
pub const ENV_METRICS_ADDRESS: &str = "METRICS_ADDRESS";
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value {value:?} for {var}: {reason}")]
    Env {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load configuration from the process environment.
pub fn from_env() -> Result<GatewayConfig, ConfigError> {
    from_lookup(|var| std::env::var(var).ok())
}

/// Load configuration using `lookup` in place of the process environment.
pub fn from_lookup<F>(lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());

    let mut config = match get(ENV_CONFIG_FILE) {
        Some(path) => read_file(Path::new(&path))?,
        None => GatewayConfig::default(),
    };

    if let Some(port) = get(ENV_PORT) {
        config.listener.port = parse_var(ENV_PORT, &port)?;
    }
    if let Some(host) = get(ENV_BIND_HOST) {
        config.listener.host = host;
    }
    if let Some(target) = get(ENV_TARGET_GENERAL) {
        config.backends.general = target;
    }
    if let Some(target) = get(ENV_TARGET_SCHEDULING) {
        config.backends.scheduling = target;
    }
    if let Some(target) = get(ENV_TARGET_NETWORK) {
        config.backends.network = target;
    }
    if let Some(credential) = get(ENV_AUTHORIZATION) {
        config.backends.general_authorization = credential;
    }
    if let Some(root) = get(ENV_STATIC_ROOT) {
        config.static_files.root = PathBuf::from(root);
    }
    if let Some(secs) = get(ENV_UPSTREAM_TIMEOUT) {
        config.timeouts.upstream_secs = parse_var(ENV_UPSTREAM_TIMEOUT, &secs)?;
    }
    if let Some(secs) = get(ENV_CONNECT_TIMEOUT) {
        config.timeouts.connect_secs = parse_var(ENV_CONNECT_TIMEOUT, &secs)?;
    }
    if let Some(addr) = get(ENV_METRICS_ADDRESS) {
        config.observability.metrics_address = Some(addr);
    }
    if let Some(level) = get(ENV_LOG_LEVEL) {
        config.observability.log_level = level;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Parse TOML text into a configuration without validating it.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

fn read_file(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
