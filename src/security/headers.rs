//! Header manipulation.
//!
//! # Responsibilities
//! - Copy inbound headers onto the outbound request
//! - Force the proxy's `User-Agent`
//! - Strip the internal trust-boundary header so callers cannot spoof it
//! - Strip hop-by-hop headers at the transport boundary (request framing
//!   only on the outbound side)
//!
//! # Design Decisions
//! - Everything else passes through untouched (cookies, auth, negotiation)
//! - Repeated inbound keys collapse to the last value

use axum::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use thiserror::Error;

use crate::config::UpstreamConfig;

/// A configured header name or value that HTTP cannot carry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidHeader {
    #[error("invalid header name {0:?}")]
    Name(String),
    #[error("invalid header value {0:?}")]
    Value(String),
}

/// Headers owned by a single connection. Regenerated per hop, never relayed.
pub const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Request framing the upstream client derives from the outbound URL and body.
pub const REQUEST_FRAMING: &[&str] = &["content-length", "host"];

/// Remove every [`HOP_BY_HOP`] header in place.
///
/// `content-length` survives: on HEAD and 304 responses it describes a body
/// that was never sent and cannot be recomputed.
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }
}

/// Strip [`HOP_BY_HOP`] plus [`REQUEST_FRAMING`] before an outbound send.
pub fn strip_for_upstream(headers: &mut HeaderMap) {
    strip_hop_by_hop(headers);
    for name in REQUEST_FRAMING {
        headers.remove(*name);
    }
}

/// Inbound → outbound header transformation.
#[derive(Debug, Clone)]
pub struct HeaderFilter {
    user_agent: HeaderValue,
    trust_header: HeaderName,
}

impl HeaderFilter {
    pub fn new(user_agent: HeaderValue, trust_header: HeaderName) -> Self {
        Self {
            user_agent,
            trust_header,
        }
    }

    /// Build from validated config. Fails only if validation was skipped.
    pub fn from_config(config: &UpstreamConfig) -> Result<Self, InvalidHeader> {
        let user_agent = HeaderValue::from_str(&config.user_agent)
            .map_err(|_| InvalidHeader::Value(config.user_agent.clone()))?;
        let trust_header = HeaderName::from_bytes(config.trust_header.as_bytes())
            .map_err(|_| InvalidHeader::Name(config.trust_header.clone()))?;
        Ok(Self::new(user_agent, trust_header))
    }

    pub fn trust_header(&self) -> &HeaderName {
        &self.trust_header
    }

    /// Produce the outbound header set for one attempt.
    pub fn apply(&self, inbound: &HeaderMap) -> HeaderMap {
        let mut outbound = HeaderMap::with_capacity(inbound.keys_len() + 1);
        for (name, value) in inbound {
            outbound.insert(name.clone(), value.clone());
        }
        outbound.insert(header::USER_AGENT, self.user_agent.clone());
        outbound.remove(&self.trust_header);
        outbound
    }
}
