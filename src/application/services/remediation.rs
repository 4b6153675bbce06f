use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::domain::ports::reclaimer::{AllocatorHint, ReclaimPressure, ResourceReclaimer};
use crate::infrastructure::metric_store::MetricStore;

/// What happened to a remediation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemediationOutcome {
    /// The cascade was started by this request.
    Started,
    /// Another cascade was already running; this request was dropped.
    Skipped,
}

/// Lifetime remediation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemediationStats {
    pub runs: u64,
    pub skips: u64,
    pub step_failures: u64,
}

/// Runs the cleanup cascade: host-registered reclaimers, an optional
/// allocator hint, then a TTL prune of the metric store.
///
/// At most one cascade runs at a time. A trigger arriving while one is in
/// progress is dropped, not queued; by the time it could run the conditions
/// it reacted to would be stale. Steps are best-effort: a failing step is
/// logged and counted, and the cascade moves on.
pub struct RemediationOrchestrator {
    reclaimers: Vec<Box<dyn ResourceReclaimer>>,
    allocator_hint: Option<AllocatorHint>,
    store: Arc<MetricStore>,
    prune_ttl: Duration,
    in_progress: AtomicBool,
    runs: AtomicU64,
    skips: AtomicU64,
    step_failures: AtomicU64,
}

impl RemediationOrchestrator {
    #[must_use]
    pub fn new(
        reclaimers: Vec<Box<dyn ResourceReclaimer>>,
        allocator_hint: Option<AllocatorHint>,
        store: Arc<MetricStore>,
        prune_ttl: Duration,
    ) -> Self {
        Self {
            reclaimers,
            allocator_hint,
            store,
            prune_ttl,
            in_progress: AtomicBool::new(false),
            runs: AtomicU64::new(0),
            skips: AtomicU64::new(0),
            step_failures: AtomicU64::new(0),
        }
    }

    /// Emergency cascade: reclaimers at `Emergency` pressure, allocator hint,
    /// then metric-store prune.
    pub async fn run_cascade(&self) -> RemediationOutcome {
        if !self.acquire() {
            return RemediationOutcome::Skipped;
        }
        info!("Starting emergency remediation cascade");

        self.run_reclaimers(ReclaimPressure::Emergency).await;

        if let Some(hint) = &self.allocator_hint {
            debug!("Issuing allocator hint");
            hint();
        }

        let evicted = self.store.prune_older_than(self.prune_ttl);
        if evicted > 0 {
            info!(evicted, "Pruned stale metric records");
        }

        self.release();
        info!("Remediation cascade complete");
        RemediationOutcome::Started
    }

    /// Routine optimization pass: reclaimers at `Routine` pressure only.
    /// No allocator hint and no store prune.
    pub async fn optimize(&self) -> RemediationOutcome {
        if !self.acquire() {
            return RemediationOutcome::Skipped;
        }
        info!("Starting routine optimization pass");

        self.run_reclaimers(ReclaimPressure::Routine).await;

        self.release();
        RemediationOutcome::Started
    }

    #[must_use]
    pub fn stats(&self) -> RemediationStats {
        RemediationStats {
            runs: self.runs.load(Ordering::Relaxed),
            skips: self.skips.load(Ordering::Relaxed),
            step_failures: self.step_failures.load(Ordering::Relaxed),
        }
    }

    async fn run_reclaimers(&self, pressure: ReclaimPressure) {
        for reclaimer in &self.reclaimers {
            match reclaimer.reclaim(pressure).await {
                Ok(report) => debug!(
                    step = reclaimer.name(),
                    %pressure,
                    freed_bytes = report.freed_bytes,
                    entries_evicted = report.entries_evicted,
                    "Reclaim step complete"
                ),
                Err(e) => {
                    self.step_failures.fetch_add(1, Ordering::Relaxed);
                    warn!(step = reclaimer.name(), %pressure, error = %e, "Reclaim step failed");
                }
            }
        }
    }

    fn acquire(&self) -> bool {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            self.runs.fetch_add(1, Ordering::Relaxed);
            true
        } else {
            self.skips.fetch_add(1, Ordering::Relaxed);
            debug!("Remediation already in progress, dropping trigger");
            false
        }
    }

    fn release(&self) {
        self.in_progress.store(false, Ordering::Release);
    }
}
