use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Metadata key tagging the outcome of a measured operation.
pub const OUTCOME_KEY: &str = "outcome";
/// Metadata value marking a failed operation.
pub const OUTCOME_FAILURE: &str = "failure";
/// Metadata value marking a successful operation.
pub const OUTCOME_SUCCESS: &str = "success";

/// Unit of a recorded metric value
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MetricUnit {
    Milliseconds,
    Bytes,
    Count,
    Percent,
}

impl std::fmt::Display for MetricUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Milliseconds => write!(f, "ms"),
            Self::Bytes => write!(f, "bytes"),
            Self::Count => write!(f, "count"),
            Self::Percent => write!(f, "%"),
        }
    }
}

/// A single immutable timestamped metric. Created by the instrumentation
/// API or the sampler, evicted FIFO once the store reaches capacity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRecord {
    pub name: String,
    pub value: f64,
    pub unit: MetricUnit,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl MetricRecord {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        value: f64,
        unit: MetricUnit,
        metadata: HashMap<String, String>,
    ) -> Self {
        Self {
            name: name.into(),
            value,
            unit,
            timestamp: Utc::now(),
            metadata,
        }
    }

    /// Whether this record's metadata marks a failed operation.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.metadata
            .get(OUTCOME_KEY)
            .is_some_and(|v| v == OUTCOME_FAILURE)
    }

    /// Whether this record measures a duration and participates in
    /// latency aggregates.
    #[must_use]
    pub const fn is_duration(&self) -> bool {
        matches!(self.unit, MetricUnit::Milliseconds)
    }
}

/// Builds outcome metadata for a measured operation.
#[must_use]
pub fn outcome_metadata(success: bool) -> HashMap<String, String> {
    let value = if success {
        OUTCOME_SUCCESS
    } else {
        OUTCOME_FAILURE
    };
    HashMap::from([(OUTCOME_KEY.to_string(), value.to_string())])
}
