//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request target ("/games/v1/list?x=1")
//!     → matcher.rs (pinned-prefix allow-list)
//!     → mapper.rs (pinned host, or first segment as subdomain)
//!     → Return: UpstreamTarget or InvalidPathError
//!
//! Mapper construction (at startup):
//!     UpstreamConfig
//!     → compile pinned prefixes
//!     → freeze as immutable UrlMapper
//! ```
//!
//! # Design Decisions
//! - Mapper built at startup, immutable at runtime
//! - No regex in hot path (prefix matching only)
//! - Deterministic: same target always maps to the same URL

pub mod mapper;
pub mod matcher;

pub use mapper::UrlMapper;
pub use matcher::{Matcher, PathPrefixMatcher, PinnedRoutes};
