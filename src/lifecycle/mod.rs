//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Validate → Build collaborators → Build proxy
//!
//! Cancellation (shutdown.rs):
//!     trigger() → pending retry waits abort → bookings end as Cancelled
//!
//! Signals (signals.rs):
//!     SIGINT → trigger cancellation
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::CancelSignal;
