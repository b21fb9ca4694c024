//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → access_control.rs (shared-secret gate, 407 on mismatch)
//!     → [forwarding engine]
//!     → headers.rs (force User-Agent, strip trust-boundary header)
//!     → Upstream client
//! ```
//!
//! # Design Decisions
//! - Fail closed: a configured secret must match exactly
//! - No trust in client input: the internal identity header never crosses the proxy

pub mod access_control;
pub mod headers;

pub use access_control::{access_control_middleware, AccessGate};
pub use headers::{HeaderFilter, InvalidHeader};
