use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::application::services::remediation::RemediationOrchestrator;
use crate::domain::alerting::{AlertChannel, AlertEngine};
use crate::domain::analysis::trend;
use crate::domain::ports::probe::{ProbeError, UsageProbe};
use crate::domain::value_objects::AlertLevel;
use crate::infrastructure::history::SnapshotHistory;
use crate::infrastructure::registry::ObserverRegistry;

/// One sampler tick: probe, record history, classify the trend, evaluate the
/// memory channel, and trigger remediation on a critical breach.
pub struct SamplerPipeline {
    probe: Arc<dyn UsageProbe>,
    history: Arc<SnapshotHistory>,
    alert_engine: Arc<AlertEngine>,
    registry: Arc<ObserverRegistry>,
    remediation: Arc<RemediationOrchestrator>,
    trend_window: usize,
    trend_noise: f64,
}

impl SamplerPipeline {
    #[must_use]
    pub fn new(
        probe: Arc<dyn UsageProbe>,
        history: Arc<SnapshotHistory>,
        alert_engine: Arc<AlertEngine>,
        registry: Arc<ObserverRegistry>,
        remediation: Arc<RemediationOrchestrator>,
        trend_window: usize,
        trend_noise: f64,
    ) -> Self {
        Self {
            probe,
            history,
            alert_engine,
            registry,
            remediation,
            trend_window,
            trend_noise,
        }
    }

    /// Runs a single sampling pass. A host without usage reporting turns
    /// this into a silent no-op.
    pub fn run_once(&self) {
        let snapshot = match self.probe.sample() {
            Ok(snapshot) => snapshot,
            Err(ProbeError::Unsupported) => {
                debug!("Usage probe unsupported on this host, skipping sample");
                return;
            }
            Err(ProbeError::ReadFailed(reason)) => {
                warn!(%reason, "Usage probe read failed, skipping sample");
                return;
            }
        };

        let percentage = snapshot.percentage;
        self.history.push(snapshot);

        let direction = trend::classify(
            &self.history.percentages(),
            self.trend_window,
            self.trend_noise,
        );
        debug!(percentage, %direction, "Sampled resource usage");

        if let Some(alert) = self.alert_engine.evaluate(AlertChannel::Memory, percentage) {
            info!(%alert.level, message = %alert.message, "Resource alert");
            let is_critical = alert.level == AlertLevel::Critical;
            self.registry.notify_alert(&alert);
            if is_critical {
                let remediation = Arc::clone(&self.remediation);
                tokio::spawn(async move {
                    remediation.run_cascade().await;
                });
            }
        }
    }
}

/// Periodic resource sampler. `start` and `stop` are idempotent; a second
/// `start` replaces the running task.
pub struct Sampler {
    pipeline: Arc<SamplerPipeline>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl Sampler {
    #[must_use]
    pub fn new(pipeline: Arc<SamplerPipeline>) -> Self {
        Self {
            pipeline,
            handle: Mutex::new(None),
        }
    }

    /// Starts the sampling loop at `interval`. Slow ticks are skipped
    /// rather than bursted.
    pub fn start(&self, interval: Duration) {
        let mut slot = self.lock();
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        let pipeline = Arc::clone(&self.pipeline);
        info!(interval_secs = interval.as_secs_f64(), "Sampler started");
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                pipeline.run_once();
            }
        }));
    }

    /// Stops the sampling loop. Calling without a running loop is a no-op.
    pub fn stop(&self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
            info!("Sampler stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.handle
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
