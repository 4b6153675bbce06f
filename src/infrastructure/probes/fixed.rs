use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::entities::snapshot::ResourceSnapshot;
use crate::domain::ports::probe::{ProbeError, UsageProbe};

const FIXED_TOTAL_BYTES: u64 = 1000;

/// Probe yielding a scripted sequence of usage percentages, repeating the
/// last one once exhausted. Deterministic input for tests and demos.
pub struct FixedProbe {
    percentages: Vec<f64>,
    cursor: AtomicUsize,
}

impl FixedProbe {
    /// An empty script behaves like a host without usage reporting.
    #[must_use]
    pub fn new(percentages: impl IntoIterator<Item = f64>) -> Self {
        Self {
            percentages: percentages.into_iter().collect(),
            cursor: AtomicUsize::new(0),
        }
    }
}

impl UsageProbe for FixedProbe {
    fn sample(&self) -> Result<ResourceSnapshot, ProbeError> {
        if self.percentages.is_empty() {
            return Err(ProbeError::Unsupported);
        }
        let index = self
            .cursor
            .fetch_add(1, Ordering::Relaxed)
            .min(self.percentages.len() - 1);
        let percentage = self.percentages[index];
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let used = (percentage / 100.0 * FIXED_TOTAL_BYTES as f64) as u64;
        Ok(ResourceSnapshot::new(used, FIXED_TOTAL_BYTES))
    }
}
