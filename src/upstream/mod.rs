//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! OutboundRequest (method, target URL, filtered headers, body)
//!     → client.rs (concurrency permit, pooled connection, read timeout)
//!     → UpstreamResponse (status, headers, full body)
//!       or TransportError (connect / timeout / TLS / malformed response)
//! ```

pub mod client;
pub mod types;

pub use client::{HttpUpstreamClient, UpstreamClient};
pub use types::{InboundRequest, OutboundRequest, RouteKind, UpstreamResponse, UpstreamTarget};
