//! Fallback policy.

use std::fmt;
use serde::Serialize;

/// Why the fallback action was invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Every primary attempt failed with a retryable error.
    Exhausted,
    /// The primary failed with an error the retry policy does not handle.
    NonRetryable,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::Exhausted => write!(f, "retries exhausted"),
            FallbackReason::NonRetryable => write!(f, "non-retryable error"),
        }
    }
}

/// The safety-net action run once the primary gives up.
///
/// The action is `FnOnce`: a fallback is never retried.
#[derive(Debug)]
pub struct FallbackPolicy<F> {
    fallback_action: F,
}

impl<F> FallbackPolicy<F> {
    pub fn new(fallback_action: F) -> Self {
        Self { fallback_action }
    }

    pub(crate) fn into_action(self) -> F {
        self.fallback_action
    }
}
