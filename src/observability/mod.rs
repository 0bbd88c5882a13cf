//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! ResilientRouter decisions
//!     → ExecutionObserver hook
//!         → logging.rs (TracingObserver: structured log events)
//!         → metrics.rs (MetricsObserver: counters, histogram)
//!
//! Consumers:
//!     → Log output (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - The router has no logging calls of its own; everything flows through observers
//! - Metrics are optional and off by default

pub mod logging;
pub mod metrics;

pub use self::logging::TracingObserver;
pub use self::metrics::MetricsObserver;
