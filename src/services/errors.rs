//! Booking error taxonomy.

use std::time::Duration;
use thiserror::Error;

/// HTTP status code for Request Timeout.
pub const REQUEST_TIMEOUT: u16 = 408;

/// Non-success response from the accommodation API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("accommodation API responded with status {status_code}")]
pub struct ApiError {
    pub status_code: u16,
}

/// Errors a backend booking call can fail with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// The new API answered with an error status.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The backend could not be reached or refused the booking.
    #[error("{backend} unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    /// The call did not finish within its deadline.
    #[error("booking call timed out after {0:?}")]
    Timeout(Duration),
}

impl BookingError {
    pub fn api(status_code: u16) -> Self {
        BookingError::Api(ApiError { status_code })
    }

    pub fn unavailable(backend: impl Into<String>, reason: impl Into<String>) -> Self {
        BookingError::Unavailable {
            backend: backend.into(),
            reason: reason.into(),
        }
    }

    /// HTTP status of an API error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            BookingError::Api(e) => Some(e.status_code),
            _ => None,
        }
    }
}

/// Retry predicate treating local deadlines and the given API statuses as transient.
pub fn retryable_statuses(codes: Vec<u16>) -> impl Fn(&BookingError) -> bool + Send + Sync + 'static {
    move |error: &BookingError| match error {
        BookingError::Timeout(_) => true,
        _ => error.status_code().is_some_and(|code| codes.contains(&code)),
    }
}
