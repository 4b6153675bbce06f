//! Trend classification over snapshot history: compares the mean usage of
//! the most recent `k` readings against the `k` readings before them.

use crate::domain::value_objects::Trend;

#[allow(clippy::cast_precision_loss)]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Classifies the direction of `percentages` (oldest first).
///
/// Requires at least `2 * window` readings, else `Unknown`. A recent/older
/// mean difference below `noise_points` is `Stable`; otherwise the sign
/// decides between `Increasing` and `Decreasing`.
#[must_use]
pub fn classify(percentages: &[f64], window: usize, noise_points: f64) -> Trend {
    if window == 0 || percentages.len() < 2 * window {
        return Trend::Unknown;
    }
    let recent_start = percentages.len() - window;
    let older_start = percentages.len() - 2 * window;
    let recent_mean = mean(&percentages[recent_start..]);
    let older_mean = mean(&percentages[older_start..recent_start]);

    let delta = recent_mean - older_mean;
    if delta.abs() < noise_points {
        Trend::Stable
    } else if delta > 0.0 {
        Trend::Increasing
    } else {
        Trend::Decreasing
    }
}
