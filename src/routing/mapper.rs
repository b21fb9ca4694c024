//! Request target → upstream URL mapping.
//!
//! # Responsibilities
//! - Route allow-listed prefixes to the pinned host, keeping the full target
//! - Otherwise treat the first path segment as a subdomain of the base domain
//! - Reject targets that cannot be mapped (no retry can fix them)
//!
//! # Design Decisions
//! - One canonical "path": the full original request target (path + query).
//!   Both the allow-list check and subdomain synthesis read it.
//! - Pure and stateless: mapping the same target twice yields the same URL
//! - No routing table; the URL shape alone selects the upstream host

use url::Url;

use crate::config::UpstreamConfig;
use crate::error::InvalidPathError;
use crate::routing::matcher::{Matcher, PinnedRoutes};
use crate::upstream::{RouteKind, UpstreamTarget};

/// Maps inbound request targets onto upstream URLs.
#[derive(Debug, Clone)]
pub struct UrlMapper {
    scheme: String,
    base_domain: String,
    pinned_host: String,
    pinned: PinnedRoutes,
}

impl UrlMapper {
    /// Create a mapper. Pinned routes go to `self_host` when given, else to
    /// the bare `base_domain`.
    pub fn new(
        scheme: impl Into<String>,
        base_domain: impl Into<String>,
        self_host: Option<String>,
        pinned: PinnedRoutes,
    ) -> Self {
        let base_domain = base_domain.into();
        let pinned_host = self_host.unwrap_or_else(|| base_domain.clone());
        Self {
            scheme: scheme.into(),
            base_domain,
            pinned_host,
            pinned,
        }
    }

    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self::new(
            config.scheme.clone(),
            config.base_domain.clone(),
            config.self_host.clone(),
            PinnedRoutes::new(config.pinned_paths.iter().cloned()),
        )
    }

    /// Compute the upstream URL for a request target such as `/games/v1/list?x=1`.
    pub fn map(&self, target: &str) -> Result<UpstreamTarget, InvalidPathError> {
        if self.pinned.matches(target) {
            let url = format!("{}://{}{}", self.scheme, self.pinned_host, target);
            return parse(url, RouteKind::Pinned);
        }

        let rest = target.strip_prefix('/').unwrap_or(target);
        let (subdomain, remainder) = rest
            .split_once('/')
            .ok_or_else(|| InvalidPathError::MissingRemainder(target.to_string()))?;

        if subdomain.is_empty() {
            return Err(InvalidPathError::EmptySubdomain(target.to_string()));
        }
        if !is_subdomain(subdomain) {
            return Err(InvalidPathError::InvalidSubdomain(subdomain.to_string()));
        }

        let url = format!(
            "{}://{}.{}/{}",
            self.scheme, subdomain, self.base_domain, remainder
        );
        parse(url, RouteKind::Subdomain)
    }
}

fn parse(url: String, kind: RouteKind) -> Result<UpstreamTarget, InvalidPathError> {
    match Url::parse(&url) {
        Ok(parsed) => Ok(UpstreamTarget::new(parsed, kind)),
        Err(_) => Err(InvalidPathError::Unparseable(url)),
    }
}

/// Dot-separated DNS labels of ASCII letters, digits and hyphens.
fn is_subdomain(segment: &str) -> bool {
    segment.split('.').all(|label| {
        !label.is_empty() && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
    })
}
