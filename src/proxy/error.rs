//! Errors surfaced to proxy callers.

use thiserror::Error;

use crate::resilience::FallbackFailure;
use crate::services::BookingError;

/// Why a booking through the proxy failed.
///
/// Primary-path failures absorbed by a successful fallback never show up here.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// A strategy without fallback hit a backend error.
    #[error("booking failed: {0}")]
    Booking(#[from] BookingError),

    /// The new backend gave up and the legacy fallback failed too.
    #[error(transparent)]
    Fallback(#[from] FallbackFailure<BookingError>),

    /// Cancellation was requested before any backend committed.
    #[error("booking cancelled after {attempts} attempt(s)")]
    Cancelled {
        attempts: u32,
        last_error: Option<BookingError>,
    },
}

impl ProxyError {
    /// The error from the last backend call that failed, if any.
    pub fn last_booking_error(&self) -> Option<&BookingError> {
        match self {
            ProxyError::Booking(e) => Some(e),
            ProxyError::Fallback(failure) => Some(failure.fallback_error()),
            ProxyError::Cancelled { last_error, .. } => last_error.as_ref(),
        }
    }
}
