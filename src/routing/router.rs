//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the ordered route rules
//! - Look up the matching rule for a request path
//! - Compute the forwarded path and upstream URI
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) prefix scan in declaration order, first match wins
//! - A rule hidden behind an earlier, more general prefix is a construction error

use axum::http::header::{HeaderName, AUTHORIZATION};
use axum::http::{HeaderMap, HeaderValue, Uri};
use serde::Serialize;

use crate::config::GatewayConfig;
use crate::routing::matcher::PathPrefixMatcher;
use crate::routing::rewrite::PathRewrite;
use crate::routing::target::{TargetError, UpstreamTarget};

/// Errors raised while building the route table.
#[derive(Debug, thiserror::Error)]
pub enum RouteTableError {
    #[error("route {route:?}: prefix {prefix:?} must start with '/'")]
    InvalidPrefix { route: String, prefix: String },

    #[error("route {later:?} ({later_prefix}) is unreachable behind {earlier:?} ({earlier_prefix})")]
    Shadowed {
        earlier: String,
        earlier_prefix: String,
        later: String,
        later_prefix: String,
    },

    #[error("{role} target: {source}")]
    Target {
        role: &'static str,
        #[source]
        source: TargetError,
    },

    #[error("invalid rewrite pattern: {0}")]
    Rewrite(#[from] regex::Error),

    #[error("invalid value for header {name}")]
    HeaderValue { name: String },
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct RouteRule {
    name: String,
    matcher: PathPrefixMatcher,
    target: UpstreamTarget,
    rewrite: Option<PathRewrite>,
    extra_headers: HeaderMap,
    change_origin: bool,
}

impl RouteRule {
    /// A pass-through rule: prefix stripped, nothing rewritten, Host set to the target.
    pub fn new(name: impl Into<String>, prefix: impl Into<String>, target: UpstreamTarget) -> Self {
        Self {
            name: name.into(),
            matcher: PathPrefixMatcher::new(prefix),
            target,
            rewrite: None,
            extra_headers: HeaderMap::new(),
            change_origin: true,
        }
    }

    pub fn with_rewrite(mut self, rewrite: PathRewrite) -> Self {
        self.rewrite = Some(rewrite);
        self
    }

    /// Add a header that overrides whatever the client sent under the same name.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    /// Keep the client's `Host` header instead of the target's authority.
    pub fn keep_host(mut self) -> Self {
        self.change_origin = false;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> &str {
        self.matcher.prefix()
    }

    pub fn matcher(&self) -> &PathPrefixMatcher {
        &self.matcher
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    pub fn rewrite(&self) -> Option<&PathRewrite> {
        self.rewrite.as_ref()
    }

    pub fn extra_headers(&self) -> &HeaderMap {
        &self.extra_headers
    }

    pub fn change_origin(&self) -> bool {
        self.change_origin
    }

    /// Path sent upstream for the suffix left after the prefix match.
    ///
    /// An empty result is forwarded as the target's root.
    pub fn forwarded_path(&self, suffix: &str) -> String {
        let path = match &self.rewrite {
            Some(rewrite) => rewrite.apply(suffix).into_owned(),
            None => suffix.to_string(),
        };
        if path.is_empty() {
            "/".to_string()
        } else if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        }
    }

    fn summary(&self) -> RouteSummary {
        RouteSummary {
            name: self.name.clone(),
            prefix: self.prefix().to_string(),
            target: self.target.to_string(),
            rewrite: self.rewrite.as_ref().map(ToString::to_string),
            extra_headers: self
                .extra_headers
                .keys()
                .map(|name| name.as_str().to_string())
                .collect(),
            change_origin: self.change_origin,
        }
    }
}

/// Printable view of a rule; header values are left out.
#[derive(Debug, Clone, Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub prefix: String,
    pub target: String,
    pub rewrite: Option<String>,
    pub extra_headers: Vec<String>,
    pub change_origin: bool,
}

/// Result of a successful lookup.
#[derive(Debug, Clone, Copy)]
pub struct RouteMatch<'a> {
    pub rule: &'a RouteRule,
    /// Request path with the rule's prefix removed.
    pub suffix: &'a str,
}

impl RouteMatch<'_> {
    pub fn forwarded_path(&self) -> String {
        self.rule.forwarded_path(self.suffix)
    }

    /// Absolute URI of the upstream request, query string carried over.
    pub fn upstream_uri(&self, query: Option<&str>) -> Result<Uri, axum::http::Error> {
        let path = self.forwarded_path();
        match query {
            Some(query) => self.rule.target.uri_for(&format!("{path}?{query}")),
            None => self.rule.target.uri_for(&path),
        }
    }
}

/// Ordered, immutable set of route rules.
#[derive(Debug, Clone)]
pub struct RouteTable {
    rules: Vec<RouteRule>,
}

impl RouteTable {
    /// Build a table from rules in priority order.
    ///
    /// Fails when a rule can never be selected because an earlier prefix
    /// already covers it (e.g. `/api` listed before `/api/schedule`).
    pub fn new(rules: Vec<RouteRule>) -> Result<Self, RouteTableError> {
        for (index, rule) in rules.iter().enumerate() {
            if !rule.prefix().starts_with('/') {
                return Err(RouteTableError::InvalidPrefix {
                    route: rule.name.clone(),
                    prefix: rule.prefix().to_string(),
                });
            }
            if let Some(earlier) = rules[..index].iter().find(|e| e.matcher.covers(&rule.matcher)) {
                return Err(RouteTableError::Shadowed {
                    earlier: earlier.name.clone(),
                    earlier_prefix: earlier.prefix().to_string(),
                    later: rule.name.clone(),
                    later_prefix: rule.prefix().to_string(),
                });
            }
        }
        Ok(Self { rules })
    }

    /// The fixed gateway table: network, schedule, latest-value, then the `/api` catch-all.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, RouteTableError> {
        let backends = &config.backends;
        let network = parse_target("network", &backends.network)?;
        let scheduling = parse_target("scheduling", &backends.scheduling)?;
        let general = parse_target("general", &backends.general)?;

        let mut credential = HeaderValue::from_str(&backends.general_authorization).map_err(|_| {
            RouteTableError::HeaderValue {
                name: AUTHORIZATION.to_string(),
            }
        })?;
        credential.set_sensitive(true);

        Self::new(vec![
            RouteRule::new("network", "/api/network", network),
            RouteRule::new("schedule", "/api/schedule", scheduling.clone())
                .with_rewrite(PathRewrite::leading_slash("/soh-schedule/")?),
            RouteRule::new("latest-value", "/api/latest-value", scheduling)
                .with_rewrite(PathRewrite::leading_slash("/latest-value/")?),
            RouteRule::new("general", "/api", general)
                .with_rewrite(PathRewrite::leading_slash("/rest/")?)
                .with_header(AUTHORIZATION, credential),
        ])
    }

    /// First rule, in table order, whose prefix covers `path`.
    pub fn match_path<'a>(&'a self, path: &'a str) -> Option<RouteMatch<'a>> {
        self.rules.iter().find_map(|rule| {
            rule.matcher
                .strip(path)
                .map(|suffix| RouteMatch { rule, suffix })
        })
    }

    pub fn rules(&self) -> &[RouteRule] {
        &self.rules
    }

    pub fn summaries(&self) -> Vec<RouteSummary> {
        self.rules.iter().map(RouteRule::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn parse_target(role: &'static str, raw: &str) -> Result<UpstreamTarget, RouteTableError> {
    UpstreamTarget::parse(raw).map_err(|source| RouteTableError::Target { role, source })
}
