//! Worst-first health classification. Pure: same inputs always classify
//! identically, including values exactly on a band boundary.

use crate::domain::value_objects::{Band, HealthBands, HealthLevel};

/// Grades one dimension against its band. A value at a cutoff crosses it.
const fn grade(value: f64, band: &Band) -> HealthLevel {
    if value >= band.poor {
        HealthLevel::Poor
    } else if value >= band.fair {
        HealthLevel::Fair
    } else if value >= band.good {
        HealthLevel::Good
    } else {
        HealthLevel::Excellent
    }
}

/// Maps (mean operation duration, error rate, resource usage) to a health
/// level. The worst dimension dominates.
#[must_use]
pub fn health(
    average_duration_ms: f64,
    error_rate_pct: f64,
    resource_pct: f64,
    bands: &HealthBands,
) -> HealthLevel {
    let latency = grade(average_duration_ms, &bands.latency_ms);
    let errors = grade(error_rate_pct, &bands.error_rate);
    let resource = grade(resource_pct, &bands.resource);
    latency.max(errors).max(resource)
}
