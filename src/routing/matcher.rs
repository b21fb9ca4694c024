//! Pinned-route matching.
//!
//! # Design Decisions
//! - Literal prefix match, case-sensitive
//! - Evaluated against the full original request target (path + query)
//! - No regex to guarantee O(n) matching

/// Trait for classifying a request target.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request target matches this condition.
    fn matches(&self, target: &str) -> bool;
}

/// Matches a literal path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, target: &str) -> bool {
        target.starts_with(&self.prefix)
    }
}

/// Combines prefix matchers with OR semantics: the pinned-route allow-list.
#[derive(Debug, Clone, Default)]
pub struct PinnedRoutes {
    prefixes: Vec<PathPrefixMatcher>,
}

impl PinnedRoutes {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(PathPrefixMatcher::new).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

impl Matcher for PinnedRoutes {
    fn matches(&self, target: &str) -> bool {
        self.prefixes.iter().any(|m| m.matches(target))
    }
}
