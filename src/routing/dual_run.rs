//! Dual-run execution.
//!
//! Runs legacy, then new, every time. The caller only ever sees the legacy
//! result; the new backend's result goes to the comparison store.

use std::fmt;
use std::future::Future;

use tokio::time::Instant;
use uuid::Uuid;

use crate::routing::comparison::{ComparisonRecord, ComparisonStore, RunOutcome};

/// Authoritative result of a dual run plus the id of its comparison record.
#[derive(Debug)]
pub struct DualRun<E> {
    pub comparison_id: Uuid,
    pub legacy: Result<(), E>,
}

#[derive(Debug, Clone, Default)]
pub struct DualRunExecutor {
    store: ComparisonStore,
}

impl DualRunExecutor {
    pub fn new(store: ComparisonStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ComparisonStore {
        &self.store
    }

    pub async fn execute<E, L, LFut, N, NFut>(&self, legacy_action: L, new_action: N) -> DualRun<E>
    where
        E: fmt::Display,
        L: FnOnce() -> LFut,
        LFut: Future<Output = Result<(), E>>,
        N: FnOnce() -> NFut,
        NFut: Future<Output = Result<(), E>>,
    {
        let started = Instant::now();
        let legacy = legacy_action().await;
        let legacy_elapsed = started.elapsed();

        let started = Instant::now();
        let new = new_action().await;
        let new_elapsed = started.elapsed();

        let record = ComparisonRecord::new(
            RunOutcome::from_result(&legacy),
            RunOutcome::from_result(&new),
            legacy_elapsed,
            new_elapsed,
        );
        let comparison_id = self.store.record(record);

        DualRun { comparison_id, legacy }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_new_failure_is_recorded_not_returned() {
        let executor = DualRunExecutor::default();

        let run = executor
            .execute(|| async { Ok::<(), String>(()) }, || async { Err("status 500".to_string()) })
            .await;

        assert!(run.legacy.is_ok());
        let record = executor.store().get(&run.comparison_id).unwrap();
        assert_eq!(record.legacy, RunOutcome::Succeeded);
        assert_eq!(record.new, RunOutcome::Failed { error: "status 500".to_string() });
        assert!(!record.agrees());
    }

    #[tokio::test]
    async fn test_both_run_even_when_legacy_fails() {
        let executor = DualRunExecutor::default();
        let new_calls = AtomicU32::new(0);

        let run = executor
            .execute(
                || async { Err("legacy down".to_string()) },
                || async {
                    new_calls.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                },
            )
            .await;

        assert_eq!(run.legacy, Err("legacy down".to_string()));
        assert_eq!(new_calls.load(Ordering::SeqCst), 1);
        assert_eq!(executor.store().summary().legacy_failures, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_records_each_side_duration() {
        let executor = DualRunExecutor::default();

        let run = executor
            .execute(
                || async {
                    tokio::time::sleep(Duration::from_millis(300)).await;
                    Ok::<(), String>(())
                },
                || async {
                    tokio::time::sleep(Duration::from_millis(120)).await;
                    Ok(())
                },
            )
            .await;

        let record = executor.store().get(&run.comparison_id).unwrap();
        assert_eq!(record.legacy_elapsed, Duration::from_millis(300));
        assert_eq!(record.new_elapsed, Duration::from_millis(120));
    }
}
