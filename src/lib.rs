//! Strangler-fig reservation proxy.
//!
//! Routes apartment bookings between a new accommodation API and a legacy
//! reservation service while traffic migrates from one to the other.

pub mod config;
pub mod lifecycle;
pub mod observability;
pub mod proxy;
pub mod resilience;
pub mod routing;
pub mod services;

pub use config::ProxyConfig;
pub use lifecycle::CancelSignal;
pub use proxy::{BookingReport, ProxyError, ReservationProxy};
pub use resilience::{ExecutionOutcome, FallbackPolicy, ResilientRouter, RetryPolicy};
pub use routing::{Strategy, Target};
