use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::application::services::remediation::RemediationOrchestrator;
use crate::domain::alerting::{AlertChannel, AlertEngine};
use crate::domain::analysis::{aggregate, classify};
use crate::domain::value_objects::thresholds::HealthBands;
use crate::domain::value_objects::HealthLevel;
use crate::infrastructure::history::SnapshotHistory;
use crate::infrastructure::metric_store::MetricStore;
use crate::infrastructure::registry::ObserverRegistry;

/// One health-check tick: aggregate the recorded metrics, evaluate the
/// error-rate and latency channels, and trigger a routine optimization
/// pass when overall health degrades to poor.
pub struct HealthCheckPipeline {
    store: Arc<MetricStore>,
    history: Arc<SnapshotHistory>,
    alert_engine: Arc<AlertEngine>,
    registry: Arc<ObserverRegistry>,
    remediation: Arc<RemediationOrchestrator>,
    bands: HealthBands,
}

impl HealthCheckPipeline {
    #[must_use]
    pub fn new(
        store: Arc<MetricStore>,
        history: Arc<SnapshotHistory>,
        alert_engine: Arc<AlertEngine>,
        registry: Arc<ObserverRegistry>,
        remediation: Arc<RemediationOrchestrator>,
        bands: HealthBands,
    ) -> Self {
        Self {
            store,
            history,
            alert_engine,
            registry,
            remediation,
            bands,
        }
    }

    /// Current overall health from aggregate stats and the latest snapshot.
    #[must_use]
    pub fn health(&self) -> HealthLevel {
        let stats = aggregate::compute(&self.store.snapshot());
        let resource_pct = self.history.latest().map_or(0.0, |s| s.percentage);
        classify::health(
            stats.average_duration_ms,
            stats.error_rate_pct,
            resource_pct,
            &self.bands,
        )
    }

    /// Runs a single health-check pass.
    pub fn run_once(&self) {
        let stats = aggregate::compute(&self.store.snapshot());
        let resource_pct = self.history.latest().map_or(0.0, |s| s.percentage);
        let level = classify::health(
            stats.average_duration_ms,
            stats.error_rate_pct,
            resource_pct,
            &self.bands,
        );
        debug!(
            %level,
            average_ms = stats.average_duration_ms,
            error_rate_pct = stats.error_rate_pct,
            resource_pct,
            "Health check"
        );

        for (channel, value) in [
            (AlertChannel::ErrorRate, stats.error_rate_pct),
            (AlertChannel::Latency, stats.average_duration_ms),
        ] {
            if let Some(alert) = self.alert_engine.evaluate(channel, value) {
                info!(%alert.level, message = %alert.message, "Operational alert");
                self.registry.notify_alert(&alert);
            }
        }

        if level == HealthLevel::Poor {
            let remediation = Arc::clone(&self.remediation);
            tokio::spawn(async move {
                remediation.optimize().await;
            });
        }
    }
}

/// Periodic health checker with the same idempotent lifecycle as the
/// sampler.
pub struct HealthCheck {
    pipeline: Arc<HealthCheckPipeline>,
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl HealthCheck {
    #[must_use]
    pub fn new(pipeline: Arc<HealthCheckPipeline>) -> Self {
        Self {
            pipeline,
            handle: Mutex::new(None),
        }
    }

    pub fn start(&self, interval: Duration) {
        let mut slot = self.lock();
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        let pipeline = Arc::clone(&self.pipeline);
        info!(interval_secs = interval.as_secs_f64(), "Health check started");
        *slot = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                pipeline.run_once();
            }
        }));
    }

    pub fn stop(&self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
            info!("Health check stopped");
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
