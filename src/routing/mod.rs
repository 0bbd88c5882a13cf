//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! book_apartments()
//!     → active Strategy (from config)
//!         FeatureFlag   → flag.rs      (flag picks new or legacy, one call)
//!         DualRun       → dual_run.rs  (legacy then new, legacy answers)
//!                           → comparison.rs (record both outcomes)
//!         RetryFallback → resilience::router (new with retry, legacy fallback)
//! ```
//!
//! # Design Decisions
//! - Exactly one strategy is active at a time; selection is configuration, not
//!   a per-call decision
//! - Strategies never run new and legacy concurrently

pub mod comparison;
pub mod dual_run;
pub mod flag;

use std::fmt;
use serde::{Deserialize, Serialize};

pub use comparison::{ComparisonRecord, ComparisonStore, ComparisonSummary, RunOutcome};
pub use dual_run::{DualRun, DualRunExecutor};
pub use flag::FlagRoutedExecutor;

/// Which routing strategy the proxy runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum Strategy {
    /// Feature flag decides between the new and the legacy backend.
    FeatureFlag,
    /// Both backends run; legacy is authoritative, new is compared.
    DualRun,
    /// New backend with retries, legacy as fallback.
    #[default]
    RetryFallback,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::FeatureFlag => write!(f, "feature_flag"),
            Strategy::DualRun => write!(f, "dual_run"),
            Strategy::RetryFallback => write!(f, "retry_fallback"),
        }
    }
}

/// Which backend implementation handled (committed) a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// The new accommodation service.
    New,
    /// The legacy reservation service.
    Legacy,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::New => write!(f, "new"),
            Target::Legacy => write!(f, "legacy"),
        }
    }
}
