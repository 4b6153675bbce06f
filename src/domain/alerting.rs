//! Per-channel threshold state machine with cooldown suppression.
//!
//! Each channel is either idle or cooling down. A breach while idle emits
//! one alert and starts the cooldown; every evaluation inside the cooldown
//! window is skipped, including a later, more severe breach — documented
//! baseline behavior.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use chrono::Utc;

use crate::domain::entities::Alert;
use crate::domain::value_objects::thresholds::{AlertThresholds, ChannelThresholds};
use crate::domain::value_objects::AlertLevel;

/// Alert channels evaluated by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlertChannel {
    /// Resource usage percentage from the sampler
    Memory,
    /// Aggregate error rate percentage from the health check
    ErrorRate,
    /// Mean operation duration from the health check
    Latency,
}

impl std::fmt::Display for AlertChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::ErrorRate => write!(f, "error_rate"),
            Self::Latency => write!(f, "latency"),
        }
    }
}

impl AlertChannel {
    const fn unit(self) -> &'static str {
        match self {
            Self::Memory | Self::ErrorRate => "%",
            Self::Latency => "ms",
        }
    }
}

/// Evaluates values against per-channel thresholds, suppressing repeats
/// within the cooldown window. Safe under concurrent producers: the
/// cooldown table is mutex-serialized, so at most one alert per channel
/// can be emitted per window.
pub struct AlertEngine {
    thresholds: AlertThresholds,
    cooldown: Duration,
    cooldown_until: Mutex<HashMap<AlertChannel, Instant>>,
}

impl AlertEngine {
    #[must_use]
    pub fn new(thresholds: AlertThresholds) -> Self {
        let cooldown = Duration::from_secs(thresholds.cooldown_secs);
        Self {
            thresholds,
            cooldown,
            cooldown_until: Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub const fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    const fn limits(&self, channel: AlertChannel) -> &ChannelThresholds {
        match channel {
            AlertChannel::Memory => &self.thresholds.memory,
            AlertChannel::ErrorRate => &self.thresholds.error_rate,
            AlertChannel::Latency => &self.thresholds.latency_ms,
        }
    }

    /// Evaluates `value` on `channel` now.
    #[must_use]
    pub fn evaluate(&self, channel: AlertChannel, value: f64) -> Option<Alert> {
        self.evaluate_at(channel, value, Instant::now())
    }

    /// Evaluates `value` on `channel` at the given instant, returning an
    /// alert when a threshold is breached outside the cooldown window.
    #[must_use]
    pub fn evaluate_at(&self, channel: AlertChannel, value: f64, now: Instant) -> Option<Alert> {
        let limits = self.limits(channel);
        let mut cooldowns = self
            .cooldown_until
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        if let Some(&until) = cooldowns.get(&channel) {
            if now < until {
                tracing::debug!("{channel} breach check skipped: cooling down");
                return None;
            }
            cooldowns.remove(&channel);
        }

        let level = if value >= limits.critical {
            AlertLevel::Critical
        } else if value >= limits.warning {
            AlertLevel::Warning
        } else {
            return None;
        };

        cooldowns.insert(channel, now + self.cooldown);
        drop(cooldowns);

        let threshold = match level {
            AlertLevel::Critical => limits.critical,
            AlertLevel::Warning => limits.warning,
        };
        Some(Alert {
            level,
            channel: channel.to_string(),
            message: format!(
                "{channel} at {value:.2}{unit} (>= {level} threshold {threshold}{unit})",
                unit = channel.unit(),
            ),
            timestamp: Utc::now(),
            triggering_value: value,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    fn engine() -> AlertEngine {
        AlertEngine::new(AlertThresholds::default())
    }

    #[test]
    fn value_below_warning_emits_nothing() {
        let engine = engine();
        assert!(engine.evaluate(AlertChannel::Memory, 50.0).is_none());
    }

    #[test]
    fn warning_breach_emits_warning() {
        let engine = engine();
        let alert = engine
            .evaluate(AlertChannel::Memory, 80.0)
            .expect("warning alert");
        assert_eq!(alert.level, AlertLevel::Warning);
        assert_eq!(alert.channel, "memory");
        assert!((alert.triggering_value - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn critical_breach_emits_critical() {
        let engine = engine();
        let alert = engine
            .evaluate(AlertChannel::Memory, 95.0)
            .expect("critical alert");
        assert_eq!(alert.level, AlertLevel::Critical);
    }

    #[test]
    fn breach_exactly_at_threshold_counts() {
        let engine = engine();
        let alert = engine
            .evaluate(AlertChannel::Memory, 90.0)
            .expect("critical at boundary");
        assert_eq!(alert.level, AlertLevel::Critical);
    }

    #[test]
    fn second_breach_inside_cooldown_is_suppressed() {
        let engine = engine();
        let t0 = Instant::now();
        assert!(engine.evaluate_at(AlertChannel::Memory, 95.0, t0).is_some());
        let halfway = t0 + Duration::from_secs(15);
        assert!(engine
            .evaluate_at(AlertChannel::Memory, 99.0, halfway)
            .is_none());
    }

    #[test]
    fn breach_after_cooldown_emits_again() {
        let engine = engine();
        let t0 = Instant::now();
        assert!(engine.evaluate_at(AlertChannel::Memory, 95.0, t0).is_some());
        assert!(engine
            .evaluate_at(AlertChannel::Memory, 95.0, t0 + Duration::from_secs(15))
            .is_none());
        let after = t0 + Duration::from_secs(31);
        assert!(engine
            .evaluate_at(AlertChannel::Memory, 95.0, after)
            .is_some());
    }

    #[test]
    fn warning_also_starts_cooldown() {
        let engine = engine();
        let t0 = Instant::now();
        let first = engine
            .evaluate_at(AlertChannel::Memory, 80.0, t0)
            .expect("warning");
        assert_eq!(first.level, AlertLevel::Warning);
        // Worsening breach inside the window stays suppressed — documented baseline
        assert!(engine
            .evaluate_at(AlertChannel::Memory, 99.0, t0 + Duration::from_secs(10))
            .is_none());
    }

    #[test]
    fn channels_cool_down_independently() {
        let engine = engine();
        let t0 = Instant::now();
        assert!(engine.evaluate_at(AlertChannel::Memory, 95.0, t0).is_some());
        assert!(engine
            .evaluate_at(AlertChannel::ErrorRate, 20.0, t0)
            .is_some());
    }

    #[test]
    fn latency_channel_uses_ms_limits() {
        let engine = engine();
        let alert = engine
            .evaluate(AlertChannel::Latency, 2500.0)
            .expect("latency alert");
        assert_eq!(alert.level, AlertLevel::Critical);
        assert_eq!(alert.channel, "latency");
        assert!(alert.message.contains("ms"));
    }
}
