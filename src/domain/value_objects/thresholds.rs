use serde::{Deserialize, Serialize};

/// Warning/critical cutoffs for a single alert channel.
/// A value at or above a cutoff breaches it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelThresholds {
    pub warning: f64,
    pub critical: f64,
}

impl ChannelThresholds {
    #[must_use]
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }
}

/// Thresholds for every alert channel plus the shared cooldown window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Resource usage percentage
    pub memory: ChannelThresholds,
    /// Aggregate error rate percentage
    pub error_rate: ChannelThresholds,
    /// Mean operation duration in milliseconds
    pub latency_ms: ChannelThresholds,
    /// Minimum interval between successive alert emissions per channel
    pub cooldown_secs: u64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            memory: ChannelThresholds::new(75.0, 90.0),
            error_rate: ChannelThresholds::new(5.0, 15.0),
            latency_ms: ChannelThresholds::new(500.0, 2000.0),
            cooldown_secs: 30,
        }
    }
}

/// Cutoffs of a single health dimension: a value below `good` is excellent,
/// at/above `poor` dominates everything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Band {
    pub good: f64,
    pub fair: f64,
    pub poor: f64,
}

impl Band {
    #[must_use]
    pub const fn new(good: f64, fair: f64, poor: f64) -> Self {
        Self { good, fair, poor }
    }
}

/// Health classification bands per input dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthBands {
    /// Mean operation duration in milliseconds
    pub latency_ms: Band,
    /// Error rate percentage
    pub error_rate: Band,
    /// Resource usage percentage
    pub resource: Band,
}

impl Default for HealthBands {
    fn default() -> Self {
        Self {
            latency_ms: Band::new(100.0, 500.0, 2000.0),
            error_rate: Band::new(1.0, 5.0, 15.0),
            resource: Band::new(60.0, 75.0, 90.0),
        }
    }
}
