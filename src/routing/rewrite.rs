//! Path rewriting applied to the suffix left after the prefix match.

use regex::Regex;
use std::borrow::Cow;
use std::fmt;

/// A single regex substitution, e.g. `^/` → `/soh-schedule/`.
///
/// Only the first match is replaced. The replacement may refer to capture
/// groups (`$1`, `${name}`).
#[derive(Debug, Clone)]
pub struct PathRewrite {
    pattern: Regex,
    replacement: String,
}

impl PathRewrite {
    pub fn new(pattern: &str, replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            replacement: replacement.into(),
        })
    }

    /// Rewrite that swaps the leading `/` of the suffix for `replacement`.
    pub fn leading_slash(replacement: impl Into<String>) -> Result<Self, regex::Error> {
        Self::new("^/", replacement)
    }

    /// Apply the substitution to `suffix`.
    ///
    /// An empty suffix has no leading `/`, so `^/` leaves it untouched.
    pub fn apply<'a>(&self, suffix: &'a str) -> Cow<'a, str> {
        self.pattern.replacen(suffix, 1, self.replacement.as_str())
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

impl fmt::Display for PathRewrite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.pattern, self.replacement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leading_slash_rewrite() {
        let rewrite = PathRewrite::leading_slash("/soh-schedule/").unwrap();
        assert_eq!(rewrite.apply("/42"), "/soh-schedule/42");
        assert_eq!(rewrite.apply("/"), "/soh-schedule/");
        assert_eq!(rewrite.apply("/a/b/c"), "/soh-schedule/a/b/c");
    }

    #[test]
    fn test_empty_suffix_untouched() {
        let rewrite = PathRewrite::leading_slash("/rest/").unwrap();
        assert_eq!(rewrite.apply(""), "");
    }

    #[test]
    fn test_only_first_match_replaced() {
        let rewrite = PathRewrite::new("/", "_").unwrap();
        assert_eq!(rewrite.apply("/a/b"), "_a/b");
    }

    #[test]
    fn test_capture_groups() {
        let rewrite = PathRewrite::new(r"^/v(\d+)/", "/version-$1/").unwrap();
        assert_eq!(rewrite.apply("/v2/items"), "/version-2/items");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PathRewrite::new("(", "/x").is_err());
    }
}
