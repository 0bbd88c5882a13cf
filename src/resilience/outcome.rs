//! Results of a routed execution.

use std::error::Error;
use std::fmt;

use crate::resilience::fallback::FallbackReason;

/// Result of one `ResilientRouter` invocation.
///
/// Exactly one of primary or fallback committed for the success variants.
#[derive(Debug)]
pub enum ExecutionOutcome<E> {
    /// The primary succeeded on attempt `attempts`.
    Succeeded { attempts: u32 },
    /// The primary gave up after `attempts` tries and the fallback succeeded.
    SucceededViaFallback { attempts: u32, reason: FallbackReason },
    /// Both the primary and the fallback failed.
    Failed(FallbackFailure<E>),
    /// Cancellation was requested before the primary succeeded. The fallback was not run.
    Cancelled { attempts: u32, last_error: Option<E> },
}

/// Payload-free discriminant of [`ExecutionOutcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    Succeeded,
    SucceededViaFallback,
    Failed,
    Cancelled,
}

impl OutcomeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeKind::Succeeded => "succeeded",
            OutcomeKind::SucceededViaFallback => "succeeded_via_fallback",
            OutcomeKind::Failed => "failed",
            OutcomeKind::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<E> ExecutionOutcome<E> {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            ExecutionOutcome::Succeeded { .. } => OutcomeKind::Succeeded,
            ExecutionOutcome::SucceededViaFallback { .. } => OutcomeKind::SucceededViaFallback,
            ExecutionOutcome::Failed(_) => OutcomeKind::Failed,
            ExecutionOutcome::Cancelled { .. } => OutcomeKind::Cancelled,
        }
    }

    /// Number of primary attempts made.
    pub fn attempts(&self) -> u32 {
        match self {
            ExecutionOutcome::Succeeded { attempts }
            | ExecutionOutcome::SucceededViaFallback { attempts, .. }
            | ExecutionOutcome::Cancelled { attempts, .. } => *attempts,
            ExecutionOutcome::Failed(failure) => failure.primary_attempts(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Succeeded { .. } | ExecutionOutcome::SucceededViaFallback { .. }
        )
    }
}

/// Terminal failure: the fallback failed after the primary gave up.
///
/// `source()` is the fallback error; the primary's last error stays available
/// as context through [`FallbackFailure::primary_error`].
#[derive(Debug)]
pub struct FallbackFailure<E> {
    fallback: E,
    primary: E,
    primary_attempts: u32,
    reason: FallbackReason,
}

impl<E> FallbackFailure<E> {
    pub fn new(fallback: E, primary: E, primary_attempts: u32, reason: FallbackReason) -> Self {
        Self {
            fallback,
            primary,
            primary_attempts,
            reason,
        }
    }

    pub fn fallback_error(&self) -> &E {
        &self.fallback
    }

    pub fn primary_error(&self) -> &E {
        &self.primary
    }

    pub fn primary_attempts(&self) -> u32 {
        self.primary_attempts
    }

    pub fn reason(&self) -> FallbackReason {
        self.reason
    }
}

impl<E: fmt::Display> fmt::Display for FallbackFailure<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "fallback failed: {} (primary gave up after {} attempt(s), {}: {})",
            self.fallback, self.primary_attempts, self.reason, self.primary
        )
    }
}

impl<E: Error + 'static> Error for FallbackFailure<E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Debug, Error)]
    #[error("{0}")]
    struct TestError(&'static str);

    #[test]
    fn test_failure_exposes_both_errors() {
        let failure = FallbackFailure::new(
            TestError("legacy down"),
            TestError("request timeout"),
            3,
            FallbackReason::Exhausted,
        );

        assert_eq!(failure.fallback_error().0, "legacy down");
        assert_eq!(failure.primary_error().0, "request timeout");
        assert_eq!(failure.source().map(|e| e.to_string()), Some("legacy down".to_string()));

        let message = failure.to_string();
        assert!(message.contains("legacy down"));
        assert!(message.contains("request timeout"));
        assert!(message.contains("3 attempt(s)"));
    }

    #[test]
    fn test_outcome_accessors() {
        let ok: ExecutionOutcome<TestError> = ExecutionOutcome::Succeeded { attempts: 2 };
        assert!(ok.is_success());
        assert_eq!(ok.attempts(), 2);
        assert_eq!(ok.kind().as_str(), "succeeded");

        let cancelled: ExecutionOutcome<TestError> = ExecutionOutcome::Cancelled { attempts: 1, last_error: None };
        assert!(!cancelled.is_success());
        assert_eq!(cancelled.kind(), OutcomeKind::Cancelled);
    }
}
