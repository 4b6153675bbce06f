use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Returns `(numerator / denominator) * 100.0`, or `0.0` when `denominator` is zero.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn safe_percent(numerator: u64, denominator: u64) -> f64 {
    if denominator > 0 {
        (numerator as f64 / denominator as f64) * 100.0
    } else {
        0.0
    }
}

/// A single point-in-time resource usage reading produced by the sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSnapshot {
    pub used_bytes: u64,
    pub total_bytes: u64,
    pub percentage: f64,
    pub timestamp: DateTime<Utc>,
}

impl ResourceSnapshot {
    /// Creates a snapshot timestamped now, deriving the usage percentage.
    #[must_use]
    pub fn new(used_bytes: u64, total_bytes: u64) -> Self {
        Self {
            used_bytes,
            total_bytes,
            percentage: safe_percent(used_bytes, total_bytes),
            timestamp: Utc::now(),
        }
    }
}
