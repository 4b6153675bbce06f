use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::entities::snapshot::ResourceSnapshot;

/// Bounded history of sampler snapshots, oldest evicted on overflow.
pub struct SnapshotHistory {
    capacity: usize,
    snapshots: Mutex<VecDeque<ResourceSnapshot>>,
}

impl SnapshotHistory {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            snapshots: Mutex::new(VecDeque::new()),
        }
    }

    pub fn push(&self, snapshot: ResourceSnapshot) {
        let mut snapshots = self.lock();
        if snapshots.len() == self.capacity {
            snapshots.pop_front();
        }
        snapshots.push_back(snapshot);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    #[must_use]
    pub fn latest(&self) -> Option<ResourceSnapshot> {
        self.lock().back().cloned()
    }

    /// Most recent `count` snapshots, oldest first.
    #[must_use]
    pub fn recent(&self, count: usize) -> Vec<ResourceSnapshot> {
        let snapshots = self.lock();
        let skip = snapshots.len().saturating_sub(count);
        snapshots.iter().skip(skip).cloned().collect()
    }

    /// Usage percentages of the full window, oldest first. Input shape for
    /// trend classification.
    #[must_use]
    pub fn percentages(&self) -> Vec<f64> {
        self.lock().iter().map(|s| s.percentage).collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, VecDeque<ResourceSnapshot>> {
        self.snapshots
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
