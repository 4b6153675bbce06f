use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::domain::entities::metric::MetricRecord;

/// Bounded, append-only record of timestamped metrics.
///
/// All mutation is mutex-serialized: the sampler and instrumentation calls
/// append concurrently. Once at capacity, the oldest record is evicted per
/// append, so the store never exceeds its cap.
pub struct MetricStore {
    capacity: usize,
    records: Mutex<VecDeque<MetricRecord>>,
}

impl MetricStore {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            records: Mutex::new(VecDeque::new()),
        }
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Appends a record, evicting the oldest when full.
    pub fn record(&self, metric: MetricRecord) {
        let mut records = self.lock();
        if records.len() == self.capacity {
            records.pop_front();
        }
        records.push_back(metric);
    }

    /// Re-scans the bounded window and returns matching records as an owned
    /// `Vec` — a finite, restartable sequence, never a consumable stream.
    pub fn query<P>(&self, predicate: P, since: Option<DateTime<Utc>>) -> Vec<MetricRecord>
    where
        P: Fn(&MetricRecord) -> bool,
    {
        self.lock()
            .iter()
            .filter(|r| since.is_none_or(|cutoff| r.timestamp >= cutoff))
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Clones out the full window, oldest first.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MetricRecord> {
        self.lock().iter().cloned().collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drops records older than `ttl`, returning how many were evicted.
    /// Used by the remediation cascade to prune stale entries.
    pub fn prune_older_than(&self, ttl: Duration) -> usize {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return 0;
        };
        let cutoff = Utc::now() - ttl;
        let mut records = self.lock();
        let before = records.len();
        records.retain(|r| r.timestamp >= cutoff);
        before - records.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<MetricRecord>> {
        self.records
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
