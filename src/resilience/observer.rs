//! Hooks for watching the router make decisions.
//!
//! The router itself stays silent; logging and metrics plug in here
//! (see `observability`).

use std::fmt;
use std::sync::Arc;

use crate::resilience::fallback::FallbackReason;
use crate::resilience::outcome::OutcomeKind;
use crate::resilience::retries::RetryDecision;

/// Receives router events. Every method defaults to a no-op.
pub trait ExecutionObserver: Send + Sync {
    /// A primary attempt failed; `decision` is what happens next.
    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn fmt::Display, _decision: RetryDecision) {}

    /// The fallback is about to run.
    fn on_fallback(&self, _reason: FallbackReason, _primary_attempts: u32) {}

    /// The invocation finished.
    fn on_outcome(&self, _outcome: OutcomeKind, _primary_attempts: u32) {}
}

/// Observer that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl ExecutionObserver for NoopObserver {}

/// Fans events out to several observers, in order.
#[derive(Clone, Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn ExecutionObserver>>,
}

impl CompositeObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl ExecutionObserver for CompositeObserver {
    fn on_attempt_failed(&self, attempt: u32, error: &dyn fmt::Display, decision: RetryDecision) {
        for observer in &self.observers {
            observer.on_attempt_failed(attempt, error, decision);
        }
    }

    fn on_fallback(&self, reason: FallbackReason, primary_attempts: u32) {
        for observer in &self.observers {
            observer.on_fallback(reason, primary_attempts);
        }
    }

    fn on_outcome(&self, outcome: OutcomeKind, primary_attempts: u32) {
        for observer in &self.observers {
            observer.on_outcome(outcome, primary_attempts);
        }
    }
}
