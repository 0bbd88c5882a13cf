//! OS signal handling.

use crate::lifecycle::CancelSignal;

/// Wait for Ctrl+C and turn it into cancellation of in-flight bookings.
pub async fn cancel_on_ctrl_c(signal: CancelSignal) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Shutdown signal received, cancelling pending retries");
            signal.trigger();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    }
}
