//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Upstream attempt fails with TransportError:
//!     → retries.rs (attempt n within bound? method retryable?)
//!     → backoff.rs (delay before attempt n+1; zero by default)
//!     → engine re-derives the outbound request from scratch
//! ```
//!
//! # Design Decisions
//! - Timeouts are enforced by the upstream client; a timeout is a transport error
//! - Retry policy is explicit and bounded, never recursive

pub mod backoff;
pub mod retries;

pub use backoff::Backoff;
pub use retries::{RetryPolicy, RetryState, MAX_RETRIES};
