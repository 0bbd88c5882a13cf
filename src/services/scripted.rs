//! Scripted backends.
//!
//! Replays a fixed list of outcomes, one per call, and counts calls. Used to
//! wire the demo binary from configuration and as a test double.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};

use crate::services::{AccommodationService, BookingError, ReservationService};

/// One scripted call result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScriptStep {
    /// Succeed immediately.
    Ok,
    /// Fail with an API error carrying this HTTP status.
    Status { code: u16 },
    /// Fail as unreachable.
    Unavailable,
    /// Succeed after sleeping. Combine with an attempt timeout to simulate hangs.
    Slow { millis: u64 },
}

/// Backend that follows a script. After the last step, the last step repeats;
/// an empty script always succeeds.
#[derive(Debug)]
pub struct ScriptedBackend {
    name: String,
    script: Vec<ScriptStep>,
    calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn new(name: impl Into<String>, script: Vec<ScriptStep>) -> Self {
        Self {
            name: name.into(),
            script,
            calls: AtomicUsize::new(0),
        }
    }

    /// A backend that always succeeds.
    pub fn healthy(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_step(&self) -> ScriptStep {
        let index = self.calls.fetch_add(1, Ordering::SeqCst);
        match self.script.last() {
            Some(last) => self.script.get(index).unwrap_or(last).clone(),
            None => ScriptStep::Ok,
        }
    }

    async fn play(&self) -> Result<(), BookingError> {
        let step = self.next_step();
        tracing::trace!(backend = %self.name, ?step, "Scripted call");
        match step {
            ScriptStep::Ok => Ok(()),
            ScriptStep::Status { code } => Err(BookingError::api(code)),
            ScriptStep::Unavailable => Err(BookingError::unavailable(&self.name, "scripted outage")),
            ScriptStep::Slow { millis } => {
                tokio::time::sleep(Duration::from_millis(millis)).await;
                Ok(())
            }
        }
    }
}

impl AccommodationService for ScriptedBackend {
    fn book_apartment(&self) -> BoxFuture<'_, Result<(), BookingError>> {
        self.play().boxed()
    }
}

impl ReservationService for ScriptedBackend {
    fn book_apartment(&self) -> BoxFuture<'_, Result<(), BookingError>> {
        self.play().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_script_replays_then_repeats_last() {
        let backend = ScriptedBackend::new(
            "accommodation",
            vec![ScriptStep::Status { code: 408 }, ScriptStep::Ok],
        );

        assert_eq!(AccommodationService::book_apartment(&backend).await, Err(BookingError::api(408)));
        assert_eq!(AccommodationService::book_apartment(&backend).await, Ok(()));
        assert_eq!(AccommodationService::book_apartment(&backend).await, Ok(()));
        assert_eq!(backend.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_script_always_succeeds() {
        let backend = ScriptedBackend::healthy("legacy");
        assert_eq!(ReservationService::book_apartment(&backend).await, Ok(()));
        assert_eq!(backend.calls(), 1);
    }

    #[test]
    fn test_steps_deserialize_from_toml() {
        #[derive(Deserialize)]
        struct Doc {
            steps: Vec<ScriptStep>,
        }

        let doc: Doc = toml::from_str(
            r#"steps = [{ kind = "status", code = 503 }, { kind = "unavailable" }, { kind = "slow", millis = 20 }]"#,
        )
        .unwrap();
        assert_eq!(
            doc.steps,
            vec![
                ScriptStep::Status { code: 503 },
                ScriptStep::Unavailable,
                ScriptStep::Slow { millis: 20 },
            ]
        );
    }
}
