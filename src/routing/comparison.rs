//! Dual-run comparison records.
//!
//! # Responsibilities
//! - Keep the outcome of both backends for every dual run
//! - Answer "where did the new backend disagree with legacy?"
//!
//! # Design Decisions
//! - In-memory only; records live as long as the store
//! - Keyed by a random UUID so concurrent runs never collide
//! - Bounded: once `capacity` records are held the oldest one is evicted

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use dashmap::DashMap;
use serde::Serialize;
use uuid::Uuid;

/// What one backend did during a dual run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded,
    Failed { error: String },
}

impl RunOutcome {
    pub fn from_result<E: std::fmt::Display>(result: &Result<(), E>) -> Self {
        match result {
            Ok(()) => RunOutcome::Succeeded,
            Err(e) => RunOutcome::Failed { error: e.to_string() },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RunOutcome::Succeeded)
    }
}

/// Both sides of one dual run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonRecord {
    pub id: Uuid,
    pub legacy: RunOutcome,
    pub new: RunOutcome,
    pub legacy_elapsed: Duration,
    pub new_elapsed: Duration,
}

impl ComparisonRecord {
    pub fn new(legacy: RunOutcome, new: RunOutcome, legacy_elapsed: Duration, new_elapsed: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            legacy,
            new,
            legacy_elapsed,
            new_elapsed,
        }
    }

    /// True when both backends either succeeded or failed.
    pub fn agrees(&self) -> bool {
        self.legacy.is_success() == self.new.is_success()
    }
}

/// Aggregate view over all recorded runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonSummary {
    pub total: usize,
    pub agreements: usize,
    pub mismatches: usize,
    pub legacy_failures: usize,
    pub new_failures: usize,
}

/// Records kept when no capacity is configured.
pub const DEFAULT_CAPACITY: usize = 10_000;

#[derive(Debug)]
struct Inner {
    records: DashMap<Uuid, ComparisonRecord>,
    /// Insertion order, oldest first. Held while inserting or evicting.
    order: Mutex<VecDeque<Uuid>>,
    capacity: AtomicUsize,
}

/// Thread-safe store of the most recent comparison records.
#[derive(Debug, Clone)]
pub struct ComparisonStore {
    inner: Arc<Inner>,
}

impl Default for ComparisonStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl ComparisonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store holding at most `capacity` records (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                records: DashMap::new(),
                order: Mutex::new(VecDeque::new()),
                capacity: AtomicUsize::new(capacity.max(1)),
            }),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.capacity.load(Ordering::Relaxed)
    }

    /// Change the bound, evicting the oldest records if the store is now over it.
    pub fn set_capacity(&self, capacity: usize) {
        self.inner.capacity.store(capacity.max(1), Ordering::Relaxed);
        let mut order = self.lock_order();
        self.evict_over_capacity(&mut order);
    }

    /// Store a record and return its id. Evicts the oldest record when full.
    pub fn record(&self, record: ComparisonRecord) -> Uuid {
        let id = record.id;
        if !record.agrees() {
            tracing::warn!(
                comparison_id = %id,
                legacy = ?record.legacy,
                new = ?record.new,
                "Dual run mismatch"
            );
        }
        let mut order = self.lock_order();
        self.inner.records.insert(id, record);
        order.push_back(id);
        self.evict_over_capacity(&mut order);
        id
    }

    pub fn get(&self, id: &Uuid) -> Option<ComparisonRecord> {
        self.inner.records.get(id).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.inner.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.records.is_empty()
    }

    /// Records where the backends disagreed.
    pub fn mismatches(&self) -> Vec<ComparisonRecord> {
        self.inner
            .records
            .iter()
            .filter(|entry| !entry.value().agrees())
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn summary(&self) -> ComparisonSummary {
        self.inner.records.iter().fold(ComparisonSummary::default(), |mut summary, entry| {
            let record = entry.value();
            summary.total += 1;
            if record.agrees() {
                summary.agreements += 1;
            } else {
                summary.mismatches += 1;
            }
            if !record.legacy.is_success() {
                summary.legacy_failures += 1;
            }
            if !record.new.is_success() {
                summary.new_failures += 1;
            }
            summary
        })
    }

    pub fn clear(&self) {
        let mut order = self.lock_order();
        order.clear();
        self.inner.records.clear();
    }

    fn lock_order(&self) -> std::sync::MutexGuard<'_, VecDeque<Uuid>> {
        // The queue is only ever pushed to or popped from, so a poisoned lock still holds valid ids.
        self.inner.order.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn evict_over_capacity(&self, order: &mut VecDeque<Uuid>) {
        let capacity = self.capacity();
        while order.len() > capacity {
            match order.pop_front() {
                Some(oldest) => {
                    self.inner.records.remove(&oldest);
                }
                None => break,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failed(error: &str) -> RunOutcome {
        RunOutcome::Failed { error: error.to_string() }
    }

    #[test]
    fn test_summary_counts() {
        let store = ComparisonStore::new();
        store.record(ComparisonRecord::new(RunOutcome::Succeeded, RunOutcome::Succeeded, Duration::ZERO, Duration::ZERO));
        store.record(ComparisonRecord::new(RunOutcome::Succeeded, failed("status 500"), Duration::ZERO, Duration::ZERO));
        store.record(ComparisonRecord::new(failed("down"), failed("status 408"), Duration::ZERO, Duration::ZERO));

        assert_eq!(
            store.summary(),
            ComparisonSummary {
                total: 3,
                agreements: 2,
                mismatches: 1,
                legacy_failures: 1,
                new_failures: 2,
            }
        );
        let mismatches = store.mismatches();
        assert_eq!(mismatches.len(), 1);
        assert_eq!(mismatches[0].new, failed("status 500"));
    }

    #[test]
    fn test_get_by_id() {
        let store = ComparisonStore::new();
        let id = store.record(ComparisonRecord::new(
            RunOutcome::Succeeded,
            RunOutcome::Succeeded,
            Duration::from_millis(3),
            Duration::from_millis(5),
        ));

        let record = store.get(&id).expect("record should be stored");
        assert_eq!(record.new_elapsed, Duration::from_millis(5));
        assert!(store.get(&Uuid::new_v4()).is_none());

        store.clear();
        assert!(store.is_empty());
    }

    fn agreeing() -> ComparisonRecord {
        ComparisonRecord::new(RunOutcome::Succeeded, RunOutcome::Succeeded, Duration::ZERO, Duration::ZERO)
    }

    #[test]
    fn test_oldest_records_are_evicted_at_capacity() {
        let store = ComparisonStore::with_capacity(3);
        let ids: Vec<Uuid> = (0..5).map(|_| store.record(agreeing())).collect();

        assert_eq!(store.len(), 3);
        assert!(store.get(&ids[0]).is_none());
        assert!(store.get(&ids[1]).is_none());
        for id in &ids[2..] {
            assert!(store.get(id).is_some());
        }
        assert_eq!(store.summary().total, 3);
    }

    #[test]
    fn test_bound_holds_under_sustained_load() {
        let store = ComparisonStore::with_capacity(100);
        for _ in 0..10_000 {
            store.record(agreeing());
        }
        assert_eq!(store.len(), 100);
    }

    #[test]
    fn test_shrinking_capacity_evicts_immediately() {
        let store = ComparisonStore::with_capacity(10);
        let ids: Vec<Uuid> = (0..6).map(|_| store.record(agreeing())).collect();

        store.set_capacity(2);
        assert_eq!(store.capacity(), 2);
        assert_eq!(store.len(), 2);
        assert!(store.get(&ids[3]).is_none());
        assert!(store.get(&ids[5]).is_some());

        store.set_capacity(0);
        assert_eq!(store.capacity(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(ComparisonStore::new().capacity(), DEFAULT_CAPACITY);
    }
}
