//! Route matching logic.
//!
//! # Responsibilities
//! - Match path prefix on whole segments (case-sensitive, byte-wise)
//! - Hand back the remaining suffix for the path rewriter
//!
//! # Design Decisions
//! - `/api/schedule` matches `/api/schedule` and `/api/schedule/...`, never `/api/scheduleX`
//! - A trailing slash on the configured prefix is ignored
//! - No regex in the matching step

use std::fmt;

/// Matches the request path prefix on segment boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrefixMatcher {
    /// Prefix without trailing slash; empty for the root prefix `/`.
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        let prefix = prefix.into();
        Self {
            prefix: prefix.trim_end_matches('/').to_string(),
        }
    }

    /// The prefix as configured, `/` for the root.
    pub fn prefix(&self) -> &str {
        if self.prefix.is_empty() {
            "/"
        } else {
            &self.prefix
        }
    }

    /// Returns the part of `path` left after the prefix, or `None` when the
    /// prefix does not cover `path`.
    ///
    /// The suffix keeps its leading `/` and is empty when `path` equals the prefix.
    pub fn strip<'a>(&self, path: &'a str) -> Option<&'a str> {
        let rest = path.strip_prefix(self.prefix.as_str())?;
        if rest.is_empty() || rest.starts_with('/') {
            Some(rest)
        } else {
            None
        }
    }

    /// Returns true if the request path matches this prefix.
    pub fn matches(&self, path: &str) -> bool {
        self.strip(path).is_some()
    }

    /// True when every path matched by `other` is also matched by `self`.
    pub fn covers(&self, other: &PathPrefixMatcher) -> bool {
        self.matches(other.prefix())
    }
}

impl fmt::Display for PathPrefixMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/api/schedule");

        assert_eq!(matcher.strip("/api/schedule/42"), Some("/42"));
        assert_eq!(matcher.strip("/api/schedule/"), Some("/"));
        assert_eq!(matcher.strip("/api/schedule"), Some(""));
        assert_eq!(matcher.strip("/api/scheduleX"), None);
        assert_eq!(matcher.strip("/api/sched"), None);
        assert_eq!(matcher.strip("/images"), None);
    }

    #[test]
    fn test_case_sensitive() {
        let matcher = PathPrefixMatcher::new("/api");
        assert!(matcher.matches("/api/devices"));
        assert!(!matcher.matches("/API/devices"));
        assert!(!matcher.matches("/apidocs"));
    }

    #[test]
    fn test_trailing_slash_in_prefix() {
        let matcher = PathPrefixMatcher::new("/api/network/");
        assert_eq!(matcher.prefix(), "/api/network");
        assert_eq!(matcher.strip("/api/network/status"), Some("/status"));
    }

    #[test]
    fn test_root_prefix() {
        let matcher = PathPrefixMatcher::new("/");
        assert_eq!(matcher.prefix(), "/");
        assert_eq!(matcher.strip("/anything/at/all"), Some("/anything/at/all"));
        assert_eq!(matcher.strip("/"), Some("/"));
    }

    #[test]
    fn test_covers() {
        let general = PathPrefixMatcher::new("/api");
        let schedule = PathPrefixMatcher::new("/api/schedule");
        let lookalike = PathPrefixMatcher::new("/apix");

        assert!(general.covers(&schedule));
        assert!(!schedule.covers(&general));
        assert!(!general.covers(&lookalike));
        assert!(PathPrefixMatcher::new("/").covers(&general));
    }
}
