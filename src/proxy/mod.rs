//! Forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! InboundRequest (buffered)
//!     → engine.rs
//!         → routing::UrlMapper (target URL)
//!         → security::HeaderFilter (outbound headers)
//!         → upstream::UpstreamClient (one attempt)
//!         → resilience::RetryPolicy (again, or give up)
//!     → UpstreamResponse or ProxyError
//! ```

pub mod engine;

pub use engine::ForwardingEngine;
