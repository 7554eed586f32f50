//! Upstream target addresses.
//!
//! A target is the base URL of one backend role. It is parsed once when the
//! route table is built; per request only the path is appended.

use axum::http::uri::{Authority, Scheme};
use axum::http::{HeaderValue, Uri};
use std::fmt;
use std::str::FromStr;
use url::{Position, Url};

/// Reasons a configured target cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TargetError {
    #[error("invalid URL {url:?}: {reason}")]
    Malformed { url: String, reason: String },

    #[error("unsupported scheme {scheme:?} in {url:?} (only http is proxied)")]
    UnsupportedScheme { url: String, scheme: String },

    #[error("{url:?} must not carry credentials, a query or a fragment")]
    UnexpectedComponent { url: String },

    #[error("host {host:?} cannot be sent as a Host header")]
    InvalidHost { host: String },
}

/// A parsed backend base address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    authority: Authority,
    host_header: HeaderValue,
    /// Base path without trailing slash; empty when the backend lives at its root.
    base_path: String,
}

impl UpstreamTarget {
    /// Parse a base URL such as `http://localhost:8081` or `http://host:8888/base`.
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let url = Url::parse(raw.trim()).map_err(|e| TargetError::Malformed {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" {
            return Err(TargetError::UnsupportedScheme {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            });
        }
        if !url.username().is_empty()
            || url.password().is_some()
            || url.query().is_some()
            || url.fragment().is_some()
        {
            return Err(TargetError::UnexpectedComponent { url: raw.to_string() });
        }

        let host_port = &url[Position::BeforeHost..Position::AfterPort];
        let authority = Authority::from_str(host_port).map_err(|e| TargetError::Malformed {
            url: raw.to_string(),
            reason: e.to_string(),
        })?;

        let host_header = HeaderValue::from_str(authority.as_str()).map_err(|_| {
            TargetError::InvalidHost {
                host: authority.to_string(),
            }
        })?;

        Ok(Self {
            authority,
            host_header,
            base_path: url.path().trim_end_matches('/').to_string(),
        })
    }

    /// `host[:port]` of the backend.
    pub fn authority(&self) -> &Authority {
        &self.authority
    }

    /// Value of the `Host` header when the origin is changed to the target.
    pub fn host_header(&self) -> &HeaderValue {
        &self.host_header
    }

    /// Absolute URI for `path_and_query` on this backend.
    pub fn uri_for(&self, path_and_query: &str) -> Result<Uri, axum::http::Error> {
        Uri::builder()
            .scheme(Scheme::HTTP)
            .authority(self.authority.clone())
            .path_and_query(format!("{}{}", self.base_path, path_and_query))
            .build()
    }
}

impl FromStr for UpstreamTarget {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}{}", self.authority, self.base_path)
    }
}
