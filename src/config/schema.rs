//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the proxy.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::resilience::Delay;
use crate::routing::comparison::DEFAULT_CAPACITY;
use crate::routing::Strategy;
use crate::services::errors::REQUEST_TIMEOUT;
use crate::services::ScriptStep;

/// Root configuration for the reservation proxy.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProxyConfig {
    /// Active routing strategy.
    pub strategy: Strategy,

    /// Retry settings for the new backend (retry_fallback strategy).
    pub retries: RetryConfig,

    /// Per-call deadlines.
    pub timeouts: TimeoutConfig,

    /// Feature flag values, applied at startup and on every reload.
    pub feature_flags: FeatureFlagConfig,

    /// Dual-run comparison retention.
    pub comparisons: ComparisonConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Scripted backend behaviour for the demo binary.
    pub simulation: SimulationConfig,
}

/// Backoff shape between primary attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Retry configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts against the new backend, the first one included.
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds (base delay for exponential).
    pub delay_ms: u64,

    /// Fixed or exponential delay.
    pub backoff: BackoffKind,

    /// Cap for exponential backoff in milliseconds.
    pub max_delay_ms: u64,

    /// API status codes treated as transient. Local timeouts always are.
    pub retryable_status_codes: Vec<u16>,
}

impl RetryConfig {
    pub fn delay(&self) -> Delay {
        let base = Duration::from_millis(self.delay_ms);
        match self.backoff {
            BackoffKind::Fixed if self.delay_ms == 0 => Delay::None,
            BackoffKind::Fixed => Delay::Fixed(base),
            BackoffKind::Exponential => Delay::Exponential {
                base,
                max: Duration::from_millis(self.max_delay_ms),
            },
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_ms: 500,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 2000,
            retryable_status_codes: vec![REQUEST_TIMEOUT],
        }
    }
}

/// Timeout configuration for backend calls.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for a single backend call in milliseconds. 0 disables it.
    pub attempt_ms: u64,
}

impl TimeoutConfig {
    pub fn attempt_deadline(&self) -> Option<Duration> {
        (self.attempt_ms > 0).then(|| Duration::from_millis(self.attempt_ms))
    }
}

/// Feature flag defaults.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FeatureFlagConfig {
    /// Route to the new accommodation API under the feature_flag strategy.
    pub accommodation_api_enabled: bool,
}

/// Dual-run comparison store settings.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ComparisonConfig {
    /// Most recent comparison records kept in memory.
    pub capacity: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// Scripted outcomes for the in-process backends.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SimulationConfig {
    pub accommodation: Vec<ScriptStep>,
    pub reservation: Vec<ScriptStep>,
}
