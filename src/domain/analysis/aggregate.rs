//! Pure window aggregation: records in, statistics out. No I/O, no caching —
//! recomputed fresh per call, which is acceptable over a bounded store.

use std::collections::BTreeMap;

use crate::domain::entities::metric::MetricRecord;
use crate::domain::entities::stats::{AggregateStats, OperationStats};

/// Rounds to two decimal places.
#[must_use]
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Computes aggregate statistics over a window of records.
///
/// Duration records (unit `ms`) feed the mean, the slowest operation, and
/// the per-operation breakdown; the total count and error rate cover every
/// record in the window.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn compute(records: &[MetricRecord]) -> AggregateStats {
    let total_metrics = records.len();
    if total_metrics == 0 {
        return AggregateStats::default();
    }

    let mut duration_sum = 0.0;
    let mut duration_count = 0usize;
    let mut slowest: Option<&MetricRecord> = None;
    let mut sums: BTreeMap<&str, (usize, f64)> = BTreeMap::new();
    let mut failures = 0usize;

    for record in records {
        if record.is_failure() {
            failures += 1;
        }
        if !record.is_duration() {
            continue;
        }
        duration_sum += record.value;
        duration_count += 1;
        // Strictly greater, so ties keep the first occurrence
        if slowest.is_none_or(|s| record.value > s.value) {
            slowest = Some(record);
        }
        let entry = sums.entry(record.name.as_str()).or_insert((0, 0.0));
        entry.0 += 1;
        entry.1 += record.value;
    }

    let average_duration_ms = if duration_count > 0 {
        duration_sum / duration_count as f64
    } else {
        0.0
    };

    let per_operation = sums
        .into_iter()
        .map(|(name, (count, sum))| {
            (
                name.to_string(),
                OperationStats {
                    count,
                    average_ms: sum / count as f64,
                },
            )
        })
        .collect();

    AggregateStats {
        total_metrics,
        average_duration_ms,
        slowest_operation: slowest.cloned(),
        per_operation,
        error_rate_pct: round2(failures as f64 / total_metrics as f64 * 100.0),
    }
}
