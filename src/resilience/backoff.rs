//! Delay schedules between primary attempts.

use std::time::Duration;
use rand::Rng;

/// How long to wait before the next primary attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    /// Retry immediately.
    None,
    /// Same wait after every failed attempt.
    Fixed(Duration),
    /// Doubling wait starting at `base`, capped at `max`, with jitter.
    Exponential { base: Duration, max: Duration },
}

impl Delay {
    /// Delay to apply after the given failed attempt (1-based).
    pub fn for_attempt(&self, attempt: u32) -> Duration {
        match *self {
            Delay::None => Duration::ZERO,
            Delay::Fixed(delay) => delay,
            Delay::Exponential { base, max } => {
                calculate_backoff(attempt, base.as_millis() as u64, max.as_millis() as u64)
            }
        }
    }
}

impl Default for Delay {
    fn default() -> Self {
        Delay::Fixed(Duration::from_millis(500))
    }
}

/// Calculate exponential backoff delay with jitter.
///
/// The jitter is taken off the capped delay (up to 10%), so the result never
/// exceeds `max_ms`.
pub fn calculate_backoff(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms);

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay - jitter)
}
