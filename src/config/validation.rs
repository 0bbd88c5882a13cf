//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempts >= 1, status codes, addresses)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{BackoffKind, ProxyConfig};

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("retries.max_attempts must be at least 1")]
    ZeroAttempts,

    #[error("retries.retryable_status_codes contains invalid HTTP status {0}")]
    InvalidStatusCode(u16),

    #[error("retries.max_delay_ms ({max}) is below retries.delay_ms ({base})")]
    BackoffCapBelowBase { base: u64, max: u64 },

    #[error("comparisons.capacity must be at least 1")]
    ZeroComparisonCapacity,

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("observability.log_level '{0}' is not a valid filter")]
    InvalidLogLevel(String),
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.retries.max_attempts == 0 {
        errors.push(ValidationError::ZeroAttempts);
    }

    for &code in &config.retries.retryable_status_codes {
        if !(100..=599).contains(&code) {
            errors.push(ValidationError::InvalidStatusCode(code));
        }
    }

    if config.retries.backoff == BackoffKind::Exponential && config.retries.max_delay_ms < config.retries.delay_ms {
        errors.push(ValidationError::BackoffCapBelowBase {
            base: config.retries.delay_ms,
            max: config.retries.max_delay_ms,
        });
    }

    if config.comparisons.capacity == 0 {
        errors.push(ValidationError::ZeroComparisonCapacity);
    }

    let observability = &config.observability;
    if observability.metrics_enabled && observability.metrics_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidMetricsAddress(observability.metrics_address.clone()));
    }

    if tracing_subscriber::EnvFilter::try_new(&observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
