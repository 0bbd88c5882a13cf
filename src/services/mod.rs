//! Backend collaborators.
//!
//! # Responsibilities
//! - Define the capabilities the proxy consumes (new accommodation API,
//!   legacy reservation service, feature flags)
//! - Define the booking error taxonomy shared by both backends
//! - Provide scripted in-process implementations for wiring and tests
//!
//! # Design Decisions
//! - Backends are trait objects; the proxy never knows which implementation it holds
//! - Both backends fail with `BookingError` so the primary's last error and the
//!   fallback's error can be reported side by side

pub mod errors;
pub mod flags;
pub mod scripted;

use futures_util::future::BoxFuture;

pub use errors::{ApiError, BookingError};
pub use flags::StaticFlags;
pub use scripted::{ScriptStep, ScriptedBackend};

/// The new accommodation API.
pub trait AccommodationService: Send + Sync {
    /// Book an apartment. Fails with [`BookingError::Api`] carrying the HTTP status.
    fn book_apartment(&self) -> BoxFuture<'_, Result<(), BookingError>>;
}

/// The legacy reservation service.
pub trait ReservationService: Send + Sync {
    fn book_apartment(&self) -> BoxFuture<'_, Result<(), BookingError>>;
}

/// Feature flags consulted by the proxy.
pub trait FeatureFlagService: Send + Sync {
    fn is_accommodation_api_enabled(&self) -> bool;

    /// Push a configured flag value into the source.
    ///
    /// Returns `false` when the source is read-only and the value was not applied.
    fn apply_accommodation_api_enabled(&self, _enabled: bool) -> bool {
        false
    }
}
