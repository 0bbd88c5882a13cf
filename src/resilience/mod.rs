//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Booking call:
//!     → timeouts.rs (optional per-call deadline)
//!     → router.rs (attempt primary, classify failure)
//!     → retries.rs (retryable? attempts left? how long to wait)
//!     → backoff.rs (fixed or exponential delay)
//!     → fallback.rs (legacy action, invoked at most once)
//!     → outcome.rs (Succeeded / SucceededViaFallback / Failed / Cancelled)
//! ```
//!
//! # Design Decisions
//! - Retry and fallback are an explicit two-stage state machine, not composed middleware
//! - `max_attempts` counts total tries of the primary, the first one included
//! - The router never logs; progress is reported to an `ExecutionObserver`
//! - Waiting between attempts is a tokio sleep, so concurrent calls never serialize

pub mod backoff;
pub mod fallback;
pub mod observer;
pub mod outcome;
pub mod retries;
pub mod router;
pub mod timeouts;

pub use backoff::Delay;
pub use fallback::{FallbackPolicy, FallbackReason};
pub use observer::{CompositeObserver, ExecutionObserver, NoopObserver};
pub use outcome::{ExecutionOutcome, FallbackFailure, OutcomeKind};
pub use retries::{RetryDecision, RetryPolicy};
pub use router::ResilientRouter;
