use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::AlertLevel;

/// A transient threshold-breach event. Delivered synchronously to
/// subscribers, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub level: AlertLevel,
    /// Channel that breached, e.g. `memory`, `error_rate`, `latency`
    pub channel: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub triggering_value: f64,
}
