//! Metrics collection and exposition.
//!
//! # Metrics
//! - `strangler_attempts_failed_total` (counter): failed primary attempts by decision
//! - `strangler_fallbacks_total` (counter): fallback invocations by reason
//! - `strangler_outcomes_total` (counter): finished invocations by outcome
//! - `strangler_primary_attempts` (histogram): primary attempts per invocation

use std::fmt;
use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::{ExecutionObserver, FallbackReason, OutcomeKind, RetryDecision};

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

fn decision_label(decision: RetryDecision) -> &'static str {
    match decision {
        RetryDecision::Retry(_) => "retry",
        RetryDecision::Exhausted => "exhausted",
        RetryDecision::NotRetryable => "not_retryable",
    }
}

fn reason_label(reason: FallbackReason) -> &'static str {
    match reason {
        FallbackReason::Exhausted => "exhausted",
        FallbackReason::NonRetryable => "non_retryable",
    }
}

/// Records router decisions as `metrics` counters.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsObserver;

impl ExecutionObserver for MetricsObserver {
    fn on_attempt_failed(&self, _attempt: u32, _error: &dyn fmt::Display, decision: RetryDecision) {
        metrics::counter!("strangler_attempts_failed_total", "decision" => decision_label(decision)).increment(1);
    }

    fn on_fallback(&self, reason: FallbackReason, _primary_attempts: u32) {
        metrics::counter!("strangler_fallbacks_total", "reason" => reason_label(reason)).increment(1);
    }

    fn on_outcome(&self, outcome: OutcomeKind, primary_attempts: u32) {
        metrics::counter!("strangler_outcomes_total", "outcome" => outcome.as_str()).increment(1);
        metrics::histogram!("strangler_primary_attempts").record(f64::from(primary_attempts));
    }
}
