//! Retry-with-fallback routing.
//!
//! # State Machine
//! ```text
//! Attempting(n) ──ok──────────────────────────▶ Succeeded
//!      │
//!      └─err─▶ decide(n, err)
//!                 ├─ Retry(delay) ─▶ Waiting ──▶ Attempting(n + 1)
//!                 │                     └─cancel─▶ Cancelled
//!                 ├─ Exhausted ────┐
//!                 └─ NotRetryable ─┴─▶ Fallback ──ok──▶ SucceededViaFallback
//!                                          └─err──▶ Failed
//! ```
//!
//! The router holds no mutable state. Concurrent `execute` calls never
//! contend on anything inside it.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::lifecycle::CancelSignal;
use crate::resilience::fallback::{FallbackPolicy, FallbackReason};
use crate::resilience::observer::{ExecutionObserver, NoopObserver};
use crate::resilience::outcome::{ExecutionOutcome, FallbackFailure};
use crate::resilience::retries::{RetryDecision, RetryPolicy};

/// Runs a primary action with bounded retry and falls back once it gives up.
#[derive(Clone)]
pub struct ResilientRouter {
    observer: Arc<dyn ExecutionObserver>,
}

impl ResilientRouter {
    pub fn new() -> Self {
        Self::with_observer(Arc::new(NoopObserver))
    }

    pub fn with_observer(observer: Arc<dyn ExecutionObserver>) -> Self {
        Self { observer }
    }

    /// Attempt `primary` under `retry`, then `fallback` if the primary gives up.
    pub async fn execute<E, P, PFut, F, FFut>(
        &self,
        primary: P,
        retry: &RetryPolicy<E>,
        fallback: FallbackPolicy<F>,
    ) -> ExecutionOutcome<E>
    where
        E: fmt::Display,
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<(), E>>,
        F: FnOnce() -> FFut,
        FFut: Future<Output = Result<(), E>>,
    {
        self.run(primary, retry, fallback, None).await
    }

    /// Like [`execute`](Self::execute), but stops with `Cancelled` if `cancel`
    /// fires before the primary succeeds. The wait between attempts is
    /// interrupted immediately; an in-flight primary call is allowed to finish.
    pub async fn execute_with_cancel<E, P, PFut, F, FFut>(
        &self,
        primary: P,
        retry: &RetryPolicy<E>,
        fallback: FallbackPolicy<F>,
        cancel: &CancelSignal,
    ) -> ExecutionOutcome<E>
    where
        E: fmt::Display,
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<(), E>>,
        F: FnOnce() -> FFut,
        FFut: Future<Output = Result<(), E>>,
    {
        self.run(primary, retry, fallback, Some(cancel)).await
    }

    async fn run<E, P, PFut, F, FFut>(
        &self,
        mut primary: P,
        retry: &RetryPolicy<E>,
        fallback: FallbackPolicy<F>,
        cancel: Option<&CancelSignal>,
    ) -> ExecutionOutcome<E>
    where
        E: fmt::Display,
        P: FnMut() -> PFut,
        PFut: Future<Output = Result<(), E>>,
        F: FnOnce() -> FFut,
        FFut: Future<Output = Result<(), E>>,
    {
        let mut attempts = 0;
        let mut last_error: Option<E> = None;

        let (reason, primary_error) = loop {
            if cancel.is_some_and(CancelSignal::is_cancelled) {
                return self.finish(ExecutionOutcome::Cancelled { attempts, last_error });
            }

            attempts += 1;
            let error = match primary().await {
                Ok(()) => return self.finish(ExecutionOutcome::Succeeded { attempts }),
                Err(error) => error,
            };

            let decision = retry.decide(attempts, &error);
            self.observer.on_attempt_failed(attempts, &error, decision);

            match decision {
                RetryDecision::Retry(delay) => {
                    last_error = Some(error);
                    if delay.is_zero() {
                        continue;
                    }
                    match cancel {
                        Some(signal) => {
                            tokio::select! {
                                _ = tokio::time::sleep(delay) => {}
                                _ = signal.cancelled() => {
                                    return self.finish(ExecutionOutcome::Cancelled { attempts, last_error });
                                }
                            }
                        }
                        None => tokio::time::sleep(delay).await,
                    }
                }
                RetryDecision::Exhausted => break (FallbackReason::Exhausted, error),
                RetryDecision::NotRetryable => break (FallbackReason::NonRetryable, error),
            }
        };

        self.observer.on_fallback(reason, attempts);
        let fallback_action = fallback.into_action();
        let outcome = match fallback_action().await {
            Ok(()) => ExecutionOutcome::SucceededViaFallback { attempts, reason },
            Err(fallback_error) => ExecutionOutcome::Failed(FallbackFailure::new(
                fallback_error,
                primary_error,
                attempts,
                reason,
            )),
        };
        self.finish(outcome)
    }

    fn finish<E>(&self, outcome: ExecutionOutcome<E>) -> ExecutionOutcome<E> {
        self.observer.on_outcome(outcome.kind(), outcome.attempts());
        outcome
    }
}

impl Default for ResilientRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ResilientRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResilientRouter").finish_non_exhaustive()
    }
}
