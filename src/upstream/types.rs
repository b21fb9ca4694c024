//! Values that flow through one forwarding operation.

use std::fmt;

use axum::body::Bytes;
use axum::http::{HeaderMap, Method, StatusCode};
use url::Url;

/// How the mapper picked the upstream host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Allow-listed prefix routed to the pinned host.
    Pinned,
    /// First path segment used as a subdomain of the base domain.
    Subdomain,
}

impl RouteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteKind::Pinned => "pinned",
            RouteKind::Subdomain => "subdomain",
        }
    }
}

/// Absolute upstream URL for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamTarget {
    url: Url,
    kind: RouteKind,
}

impl UpstreamTarget {
    pub fn new(url: Url, kind: RouteKind) -> Self {
        Self { url, kind }
    }

    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    pub fn into_url(self) -> Url {
        self.url
    }
}

impl fmt::Display for UpstreamTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

/// The caller's request, fully buffered. Read-only for its whole lifetime.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    /// Original request target: path plus query string.
    pub target: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl InboundRequest {
    pub fn new(method: Method, target: impl Into<String>, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            target: target.into(),
            headers,
            body,
        }
    }
}

/// One attempt's request to the upstream. Built once, never mutated.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    method: Method,
    target: UpstreamTarget,
    headers: HeaderMap,
    body: Bytes,
}

impl OutboundRequest {
    pub fn new(method: Method, target: UpstreamTarget, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            target,
            headers,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &UpstreamTarget {
        &self.target
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    pub fn into_parts(self) -> (Method, UpstreamTarget, HeaderMap, Bytes) {
        (self.method, self.target, self.headers, self.body)
    }
}

/// A complete upstream response.
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}
