//! Retry logic.
//!
//! # Responsibilities
//! - Bound the number of attempts per inbound request
//! - Decide whether a transport failure earns another attempt
//! - Supply the backoff delay between attempts
//!
//! # Design Decisions
//! - Only transport errors are retried; mapping and auth errors are terminal
//! - Every method is retried by default, including non-idempotent ones.
//!   A POST that reached the upstream before the connection died may be
//!   applied twice. `idempotent_only` closes that hole.
//! - A zero or negative bound means a single attempt

use axum::http::Method;

use crate::config::RetryConfig;
use crate::resilience::backoff::Backoff;

/// Largest retry bound; keeps `max_retries + 1` attempts representable.
pub const MAX_RETRIES: u32 = u32::MAX - 1;

/// Retry bound and strategy shared by every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    idempotent_only: bool,
    backoff: Backoff,
}

impl RetryPolicy {
    /// `max_retries` is clamped into `0..=MAX_RETRIES`.
    pub fn new(max_retries: i64, idempotent_only: bool, backoff: Backoff) -> Self {
        let max_retries = u32::try_from(max_retries.max(0))
            .unwrap_or(MAX_RETRIES)
            .min(MAX_RETRIES);
        Self {
            max_retries,
            idempotent_only,
            backoff,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            config.idempotent_only,
            Backoff::from_config(&config.backoff),
        )
    }

    /// Retries allowed after the first attempt.
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Upper bound on attempts for a single request.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries + 1
    }

    pub fn backoff(&self) -> Backoff {
        self.backoff
    }

    /// Whether `method` may be retried at all under this policy.
    pub fn is_retryable(&self, method: &Method) -> bool {
        !self.idempotent_only || method.is_idempotent()
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

/// Attempt counter for one inbound request. Starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryState {
    attempt: u32,
}

impl RetryState {
    pub fn new() -> Self {
        Self { attempt: 1 }
    }

    /// The attempt currently in flight (1-based).
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Advance after a transport failure. Returns `false` once the bound is
    /// spent, leaving the counter at the last attempt made.
    pub fn advance(&mut self, policy: &RetryPolicy, method: &Method) -> bool {
        if self.attempt >= policy.max_attempts() || !policy.is_retryable(method) {
            return false;
        }
        self.attempt += 1;
        true
    }
}

impl Default for RetryState {
    fn default() -> Self {
        Self::new()
    }
}
