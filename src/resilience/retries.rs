//! Retry policy for the primary backend.
//!
//! # Responsibilities
//! - Bound the number of primary attempts
//! - Classify failures as retryable (transient) or not
//! - Decide, after each failure, whether to wait and retry or hand over to the fallback
//!
//! # Design Decisions
//! - `max_attempts` is the total number of tries: `max_attempts = 3` means the
//!   first call plus two retries
//! - Only errors matching the predicate consume a retry; anything else goes
//!   straight to the fallback without waiting

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::resilience::backoff::Delay;

type RetryableCheck<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// What the router does after a failed primary attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Wait for the given duration, then try the primary again.
    Retry(Duration),
    /// The error was retryable but no attempts are left.
    Exhausted,
    /// The error is not retryable.
    NotRetryable,
}

/// Immutable retry configuration for one kind of call.
pub struct RetryPolicy<E> {
    max_attempts: u32,
    retryable: RetryableCheck<E>,
    delay: Delay,
}

impl<E> RetryPolicy<E> {
    /// Create a policy. `max_attempts` below 1 is raised to 1.
    pub fn new<F>(max_attempts: u32, retryable: F, delay: Delay) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        Self {
            max_attempts: max_attempts.max(1),
            retryable: Arc::new(retryable),
            delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Delay {
        self.delay
    }

    pub fn is_retryable(&self, error: &E) -> bool {
        (self.retryable)(error)
    }

    /// Decide what follows the failure of attempt number `attempt` (1-based).
    pub fn decide(&self, attempt: u32, error: &E) -> RetryDecision {
        if !self.is_retryable(error) {
            RetryDecision::NotRetryable
        } else if attempt >= self.max_attempts {
            RetryDecision::Exhausted
        } else {
            RetryDecision::Retry(self.delay.for_attempt(attempt))
        }
    }
}

impl<E: 'static> RetryPolicy<E> {
    /// A policy that makes a single attempt and never retries.
    pub fn no_retry() -> Self {
        Self::new(1, |_: &E| false, Delay::None)
    }
}

impl<E> Clone for RetryPolicy<E> {
    fn clone(&self) -> Self {
        Self {
            max_attempts: self.max_attempts,
            retryable: Arc::clone(&self.retryable),
            delay: self.delay,
        }
    }
}

impl<E> fmt::Debug for RetryPolicy<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("max_attempts", &self.max_attempts)
            .field("delay", &self.delay)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeouts_only() -> RetryPolicy<u16> {
        RetryPolicy::new(3, |status: &u16| *status == 408, Delay::Fixed(Duration::from_millis(500)))
    }

    #[test]
    fn test_retryable_error_retries_until_last_attempt() {
        let policy = timeouts_only();
        assert_eq!(policy.decide(1, &408), RetryDecision::Retry(Duration::from_millis(500)));
        assert_eq!(policy.decide(2, &408), RetryDecision::Retry(Duration::from_millis(500)));
        assert_eq!(policy.decide(3, &408), RetryDecision::Exhausted);
    }

    #[test]
    fn test_non_retryable_error_skips_retries() {
        let policy = timeouts_only();
        assert_eq!(policy.decide(1, &500), RetryDecision::NotRetryable);
    }

    #[test]
    fn test_zero_attempts_is_clamped() {
        let policy = RetryPolicy::new(0, |_: &u16| true, Delay::None);
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.decide(1, &408), RetryDecision::Exhausted);
    }

    #[test]
    fn test_no_retry_policy() {
        let policy = RetryPolicy::<u16>::no_retry();
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.decide(1, &408), RetryDecision::NotRetryable);
    }
}
