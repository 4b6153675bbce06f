use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::entities::metric::MetricRecord;
use crate::domain::entities::snapshot::ResourceSnapshot;
use crate::domain::value_objects::{ChannelThresholds, Trend};

/// Per-operation aggregate over duration records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationStats {
    pub count: usize,
    pub average_ms: f64,
}

/// Aggregate statistics over a window of the metric store.
/// Derived on demand, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    /// Every record in the window, duration or not
    pub total_metrics: usize,
    /// Mean over duration records only
    pub average_duration_ms: f64,
    /// Single slowest duration record; ties keep the first occurrence
    pub slowest_operation: Option<MetricRecord>,
    pub per_operation: BTreeMap<String, OperationStats>,
    /// Failed records / total records * 100, rounded to two decimals
    pub error_rate_pct: f64,
}

/// Memory usage report exposed to hosts, `None` when the host cannot
/// report usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryReport {
    pub current: ResourceSnapshot,
    pub trend: Trend,
    pub recent_history: Vec<ResourceSnapshot>,
    pub thresholds: ChannelThresholds,
}
