//! Dispatch pattern matching.
//!
//! # Responsibilities
//! - Compile `"<host>/<path>"` patterns into matchers
//! - Match host (exact or `*suffix`, byte-exact)
//! - Match path (exact or `prefix*`, leading `/` stripped)
//! - Combine host and path with AND semantics
//!
//! # Design Decisions
//! - Variant selection happens once, at compile time
//! - Host suffix matching is literal, not DNS-label-aware
//! - No regex: a single `*` is the only wildcard, so validation is a scan

use std::fmt;
use std::str::FromStr;

use crate::error::PatternError;

const WILDCARD: char = '*';

/// Exact, prefix or suffix string predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringMatcher {
    Exact(String),
    Prefix(String),
    Suffix(String),
}

impl StringMatcher {
    /// Returns true if `candidate` satisfies this predicate.
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Self::Exact(expected) => candidate == expected,
            Self::Prefix(prefix) => candidate.starts_with(prefix.as_str()),
            Self::Suffix(suffix) => candidate.ends_with(suffix.as_str()),
        }
    }
}

/// Matches the host part of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostMatcher {
    /// `*`: every host, including the empty one.
    Any,
    Pattern(StringMatcher),
}

impl HostMatcher {
    /// Compile a host pattern: `*`, `*suffix` or an exact host.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern == "*" {
            return Ok(Self::Any);
        }

        let (is_suffix, rest) = match pattern.strip_prefix(WILDCARD) {
            Some(rest) => (true, rest),
            None => (false, pattern),
        };
        if rest.is_empty() || rest.contains(WILDCARD) {
            return Err(PatternError::InvalidHost(pattern.to_string()));
        }

        let matcher = if is_suffix {
            StringMatcher::Suffix(rest.to_string())
        } else {
            StringMatcher::Exact(rest.to_string())
        };
        Ok(Self::Pattern(matcher))
    }

    pub fn matches(&self, host: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Pattern(m) => m.matches(host),
        }
    }
}

/// Matches the path part of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatcher {
    /// Empty pattern or `*`: every path.
    Any,
    Pattern(StringMatcher),
}

impl PathMatcher {
    /// Compile a path pattern (no leading `/`): empty, `*`, `prefix*` or exact.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        if pattern.is_empty() || pattern == "*" {
            return Ok(Self::Any);
        }

        let (is_prefix, body) = match pattern.strip_suffix(WILDCARD) {
            Some(body) => (true, body),
            None => (false, pattern),
        };
        if body.is_empty() || body.contains(WILDCARD) {
            return Err(PatternError::InvalidPath(pattern.to_string()));
        }

        let matcher = if is_prefix {
            StringMatcher::Prefix(body.to_string())
        } else {
            StringMatcher::Exact(body.to_string())
        };
        Ok(Self::Pattern(matcher))
    }

    /// Match a request path. The leading `/` is not part of the pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Pattern(m) => m.matches(path.strip_prefix('/').unwrap_or(path)),
        }
    }
}

/// A compiled `"<host>/<path>"` dispatch pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPathMatcher {
    pattern: String,
    host: HostMatcher,
    path: PathMatcher,
}

impl HostPathMatcher {
    /// Compile a pattern. The host/path split happens at the first `/`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let (host, path) = pattern
            .split_once('/')
            .ok_or_else(|| PatternError::MissingPath {
                pattern: pattern.to_string(),
            })?;

        let host = HostMatcher::compile(host).map_err(|e| e.in_pattern(pattern))?;
        let path = PathMatcher::compile(path).map_err(|e| e.in_pattern(pattern))?;

        Ok(Self {
            pattern: pattern.to_string(),
            host,
            path,
        })
    }

    /// Returns true if both host and path match.
    pub fn matches(&self, host: &str, path: &str) -> bool {
        self.host.matches(host) && self.path.matches(path)
    }

    /// The source pattern, for diagnostics.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl FromStr for HostPathMatcher {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::compile(s)
    }
}

impl fmt::Display for HostPathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
