//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap a single backend call with an optional deadline
//! - Turn an elapsed deadline into the caller's own error type
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - No deadline configured means the call runs unbounded
//! - The deadline applies per attempt; the retry delay is not included

use std::future::Future;
use std::time::Duration;

/// Run `fut`, failing with `on_elapsed(deadline)` if it does not finish in time.
pub async fn with_deadline<T, E, Fut, M>(
    deadline: Option<Duration>,
    fut: Fut,
    on_elapsed: M,
) -> Result<T, E>
where
    Fut: Future<Output = Result<T, E>>,
    M: FnOnce(Duration) -> E,
{
    match deadline {
        Some(limit) => match tokio::time::timeout(limit, fut).await {
            Ok(result) => result,
            Err(_) => Err(on_elapsed(limit)),
        },
        None => fut.await,
    }
}
