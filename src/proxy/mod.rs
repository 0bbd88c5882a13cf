//! Reservation proxy.
//!
//! # Data Flow
//! ```text
//! caller → ReservationProxy::book_apartments()
//!     → load active ProxySettings (ArcSwap, lock-free)
//!     → dispatch on Strategy
//!         → each backend call wrapped in the attempt deadline
//!     → BookingReport (who handled it, how many attempts) or ProxyError
//! ```
//!
//! # Design Decisions
//! - The proxy owns collaborators as trait objects and never inspects them
//! - Settings are swapped whole; an in-flight booking keeps the settings it started with

pub mod error;
pub mod reservation;

pub use error::ProxyError;
pub use reservation::{BookingReport, ProxySettings, ReservationProxy};
