//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Log router decisions through the `ExecutionObserver` hook
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` overrides the configured level

use std::fmt;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::resilience::{ExecutionObserver, FallbackReason, OutcomeKind, RetryDecision};

/// Install the global subscriber. `default_level` applies when `RUST_LOG` is unset.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("strangler_proxy={default_level}")));

    // A second init (tests, embedding) keeps the first subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Emits a structured event for every router decision.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExecutionObserver for TracingObserver {
    fn on_attempt_failed(&self, attempt: u32, error: &dyn fmt::Display, decision: RetryDecision) {
        match decision {
            RetryDecision::Retry(delay) => {
                tracing::info!(attempt, error = %error, delay = ?delay, "Primary attempt failed, retrying");
            }
            RetryDecision::Exhausted => {
                tracing::warn!(attempt, error = %error, "Primary attempts exhausted");
            }
            RetryDecision::NotRetryable => {
                tracing::warn!(attempt, error = %error, "Primary failed with non-retryable error");
            }
        }
    }

    fn on_fallback(&self, reason: FallbackReason, primary_attempts: u32) {
        tracing::info!(reason = %reason, primary_attempts, "Invoking fallback");
    }

    fn on_outcome(&self, outcome: OutcomeKind, primary_attempts: u32) {
        match outcome {
            OutcomeKind::Failed => {
                tracing::error!(outcome = %outcome, primary_attempts, "Booking failed on both backends");
            }
            _ => tracing::debug!(outcome = %outcome, primary_attempts, "Routed execution finished"),
        }
    }
}
