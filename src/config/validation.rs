//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every backend target is a usable http base URL
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use axum::http::HeaderValue;
use std::net::SocketAddr;

use crate::config::schema::GatewayConfig;
use crate::routing::target::{TargetError, UpstreamTarget};

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{role} backend: {source}")]
    Target {
        role: &'static str,
        #[source]
        source: TargetError,
    },

    #[error("general backend authorization is not a valid header value")]
    Authorization,

    #[error("listener host must not be empty")]
    EmptyHost,

    #[error("timeouts.{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("static_files.root must not be empty")]
    EmptyStaticRoot,

    #[error("static_files.index {0:?} must be a plain file name")]
    InvalidIndex(String),

    #[error("observability.metrics_address {0:?} is not a socket address")]
    MetricsAddress(String),
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let backends = &config.backends;
    for (role, raw) in [
        ("general", &backends.general),
        ("scheduling", &backends.scheduling),
        ("network", &backends.network),
    ] {
        if let Err(source) = UpstreamTarget::parse(raw) {
            errors.push(ValidationError::Target { role, source });
        }
    }

    if HeaderValue::from_str(&backends.general_authorization).is_err() {
        errors.push(ValidationError::Authorization);
    }

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_secs"));
    }
    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("upstream_secs"));
    }

    if config.static_files.root.as_os_str().is_empty() {
        errors.push(ValidationError::EmptyStaticRoot);
    }
    let index = &config.static_files.index;
    if index.is_empty() || index.contains(['/', '\\']) || index == ".." || index == "." {
        errors.push(ValidationError::InvalidIndex(index.clone()));
    }

    if let Some(addr) = &config.observability.metrics_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::MetricsAddress(addr.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&GatewayConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GatewayConfig::default();
        config.backends.general = "https://general:8888".into();
        config.backends.network = "::".into();
        config.timeouts.upstream_secs = 0;
        config.static_files.index = "../index.html".into();
        config.observability.metrics_address = Some("nope".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 5);
        assert!(matches!(errors[0], ValidationError::Target { role: "general", .. }));
        assert!(matches!(errors[1], ValidationError::Target { role: "network", .. }));
        assert!(errors.contains(&ValidationError::ZeroTimeout("upstream_secs")));
        assert!(errors.contains(&ValidationError::InvalidIndex("../index.html".into())));
        assert!(errors.contains(&ValidationError::MetricsAddress("nope".into())));
    }

    #[test]
    fn test_bad_authorization() {
        let mut config = GatewayConfig::default();
        config.backends.general_authorization = "Basic \u{7f}".into();
        assert_eq!(validate_config(&config), Err(vec![ValidationError::Authorization]));
    }
}
