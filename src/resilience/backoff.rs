//! Delay between retry attempts.

use std::time::Duration;
use rand::Rng;

use crate::config::{BackoffConfig, BackoffKind};

/// Swappable wait policy applied before each retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Retry immediately.
    #[default]
    None,
    /// Constant delay.
    Fixed(Duration),
    /// Exponential growth with jitter.
    Exponential { base_ms: u64, max_ms: u64 },
}

impl Backoff {
    pub fn from_config(config: &BackoffConfig) -> Self {
        match config.strategy {
            BackoffKind::None => Backoff::None,
            BackoffKind::Fixed => Backoff::Fixed(Duration::from_millis(config.base_delay_ms)),
            BackoffKind::Exponential => Backoff::Exponential {
                base_ms: config.base_delay_ms,
                max_ms: config.max_delay_ms,
            },
        }
    }

    /// Delay to wait after failed attempt number `attempt` (1-based).
    ///
    /// Exponential doubles per attempt from `base_ms`, stops at `max_ms`,
    /// then adds up to a tenth of the result as random spread.
    pub fn delay(&self, attempt: u32) -> Duration {
        match *self {
            Backoff::None => Duration::ZERO,
            Backoff::Fixed(delay) => delay,
            Backoff::Exponential { base_ms, max_ms } => {
                let doublings = attempt.saturating_sub(1);
                let ceiling = base_ms
                    .saturating_mul(2u64.saturating_pow(doublings))
                    .min(max_ms);
                let spread = ceiling / 10;
                let extra = if spread == 0 {
                    0
                } else {
                    rand::thread_rng().gen_range(0..spread)
                };
                Duration::from_millis(ceiling + extra)
            }
        }
    }
}
