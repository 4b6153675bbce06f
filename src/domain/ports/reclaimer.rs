use async_trait::async_trait;
use thiserror::Error;

/// Optional host allocator hint, probed once at construction. Called during
/// an emergency cascade to nudge the allocator into returning free pages
/// (e.g. a `malloc_trim` or jemalloc purge). Absence is a normal state.
pub type AllocatorHint = Box<dyn Fn() + Send + Sync>;

#[derive(Error, Debug)]
pub enum ReclaimError {
    #[error("reclaim step failed: {0}")]
    Failed(String),
}

/// How aggressively a reclaimer should free resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReclaimPressure {
    /// Lighter, non-emergency optimization pass
    Routine,
    /// Critical-alert cascade: drop everything droppable
    Emergency,
}

impl std::fmt::Display for ReclaimPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Routine => write!(f, "routine"),
            Self::Emergency => write!(f, "emergency"),
        }
    }
}

/// What a reclaim step managed to free.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReclaimReport {
    pub freed_bytes: u64,
    pub entries_evicted: usize,
}

/// Host-registered cleanup hook invoked during remediation.
///
/// The engine owns no caller state; eviction of caller-owned caches is
/// delegated to implementations of this port registered at construction.
/// Steps are independent and best-effort: one failing step never stops
/// the cascade.
#[async_trait]
pub trait ResourceReclaimer: Send + Sync {
    /// Stable step name used in logs.
    fn name(&self) -> &'static str;

    /// Free host-owned resources at the requested pressure.
    ///
    /// # Errors
    ///
    /// Returns `ReclaimError` when the step fails; the orchestrator logs it
    /// and continues with the next step.
    async fn reclaim(&self, pressure: ReclaimPressure) -> Result<ReclaimReport, ReclaimError>;
}
