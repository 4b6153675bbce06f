//! Host-facing facade wiring the store, sampler, alerting, health check
//! and remediation together behind one handle.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tracing::warn;

use crate::application::config::EngineConfig;
use crate::application::services::health_check::{HealthCheck, HealthCheckPipeline};
use crate::application::services::remediation::{
    RemediationOrchestrator, RemediationOutcome, RemediationStats,
};
use crate::application::services::sampler::{Sampler, SamplerPipeline};
use crate::domain::alerting::AlertEngine;
use crate::domain::analysis::{aggregate, trend};
use crate::domain::entities::metric::{outcome_metadata, MetricRecord, MetricUnit};
use crate::domain::entities::stats::{AggregateStats, MemoryReport};
use crate::domain::entities::Alert;
use crate::domain::ports::probe::UsageProbe;
use crate::domain::ports::reclaimer::{AllocatorHint, ResourceReclaimer};
use crate::domain::value_objects::thresholds::HealthBands;
use crate::domain::value_objects::HealthLevel;
use crate::infrastructure::history::SnapshotHistory;
use crate::infrastructure::metric_store::MetricStore;
use crate::infrastructure::registry::{ObserverRegistry, Subscription};

/// Number of snapshots included in a [`MemoryReport`].
const REPORT_HISTORY_LEN: usize = 10;

/// The engine facade. One instance per monitored process; all methods take
/// `&self` and are safe to call from concurrent tasks.
pub struct PerfMonitor {
    store: Arc<MetricStore>,
    history: Arc<SnapshotHistory>,
    registry: Arc<ObserverRegistry>,
    alert_engine: Arc<AlertEngine>,
    remediation: Arc<RemediationOrchestrator>,
    probe: Arc<dyn UsageProbe>,
    sampler: Sampler,
    health_check: HealthCheck,
    health_pipeline: Arc<HealthCheckPipeline>,
    timers: Mutex<HashMap<String, Instant>>,
    sample_interval: Duration,
    health_interval: Duration,
    trend_window: usize,
    trend_noise: f64,
}

impl PerfMonitor {
    /// Builds an engine from config, a usage probe and host-registered
    /// remediation hooks. Nothing runs until [`Self::start_monitoring`].
    #[must_use]
    pub fn new(
        config: &EngineConfig,
        probe: Arc<dyn UsageProbe>,
        reclaimers: Vec<Box<dyn ResourceReclaimer>>,
        allocator_hint: Option<AllocatorHint>,
    ) -> Self {
        let thresholds = (&config.alerts).into();
        let bands: HealthBands = (&config.health).into();

        let store = Arc::new(MetricStore::new(config.retention.metric_capacity));
        let history = Arc::new(SnapshotHistory::new(config.retention.history_capacity));
        let registry = Arc::new(ObserverRegistry::new());
        let alert_engine = Arc::new(AlertEngine::new(thresholds));
        let remediation = Arc::new(RemediationOrchestrator::new(
            reclaimers,
            allocator_hint,
            Arc::clone(&store),
            Duration::from_secs(config.retention.prune_ttl_secs),
        ));

        let sampler_pipeline = Arc::new(SamplerPipeline::new(
            Arc::clone(&probe),
            Arc::clone(&history),
            Arc::clone(&alert_engine),
            Arc::clone(&registry),
            Arc::clone(&remediation),
            config.trend.window,
            config.trend.noise_points,
        ));
        let health_pipeline = Arc::new(HealthCheckPipeline::new(
            Arc::clone(&store),
            Arc::clone(&history),
            Arc::clone(&alert_engine),
            Arc::clone(&registry),
            Arc::clone(&remediation),
            bands,
        ));

        Self {
            store,
            history,
            registry,
            alert_engine,
            remediation,
            probe,
            sampler: Sampler::new(sampler_pipeline),
            health_check: HealthCheck::new(Arc::clone(&health_pipeline)),
            health_pipeline,
            timers: Mutex::new(HashMap::new()),
            sample_interval: Duration::from_secs(config.sampling.interval_secs),
            health_interval: Duration::from_secs(config.sampling.health_check_interval_secs),
            trend_window: config.trend.window,
            trend_noise: config.trend.noise_points,
        }
    }

    // --- Instrumentation ---

    /// Records an ad-hoc metric and notifies metric subscribers.
    pub fn record_metric(
        &self,
        name: impl Into<String>,
        value: f64,
        unit: MetricUnit,
        metadata: HashMap<String, String>,
    ) {
        let record = MetricRecord::new(name, value, unit, metadata);
        self.registry.notify_metric(&record);
        self.store.record(record);
    }

    /// Starts a named timer. Starting an already-running label restarts it.
    pub fn start_timer(&self, label: impl Into<String>) {
        self.lock_timers().insert(label.into(), Instant::now());
    }

    /// Stops a named timer, records its duration and returns the elapsed
    /// milliseconds. Ending a timer that was never started logs a warning
    /// and returns `0.0` without recording anything.
    pub fn end_timer(&self, label: &str, metadata: HashMap<String, String>) -> f64 {
        let Some(started) = self.lock_timers().remove(label) else {
            warn!(label, "end_timer called without a matching start_timer");
            return 0.0;
        };
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.record_metric(label, elapsed_ms, MetricUnit::Milliseconds, metadata);
        elapsed_ms
    }

    /// Measures a fallible async operation, recording its duration tagged
    /// with the outcome. The operation's result is returned unchanged.
    pub async fn measure_operation<T, E, F>(&self, name: &str, operation: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let started = Instant::now();
        let result = operation.await;
        let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
        self.record_metric(
            name,
            elapsed_ms,
            MetricUnit::Milliseconds,
            outcome_metadata(result.is_ok()),
        );
        result
    }

    // --- Reporting ---

    /// Aggregate statistics, over the full store or only records newer
    /// than `window`.
    #[must_use]
    pub fn stats(&self, window: Option<Duration>) -> AggregateStats {
        let records = match window.and_then(|w| chrono::Duration::from_std(w).ok()) {
            Some(w) => self.store.query(|_| true, Some(chrono::Utc::now() - w)),
            None => self.store.snapshot(),
        };
        aggregate::compute(&records)
    }

    /// Point-in-time memory report, `None` when the host cannot report
    /// usage.
    #[must_use]
    pub fn memory_stats(&self) -> Option<MemoryReport> {
        let current = self.probe.sample().ok()?;
        Some(MemoryReport {
            current,
            trend: trend::classify(
                &self.history.percentages(),
                self.trend_window,
                self.trend_noise,
            ),
            recent_history: self.history.recent(REPORT_HISTORY_LEN),
            thresholds: self.alert_engine.thresholds().memory,
        })
    }

    /// Current overall health level.
    #[must_use]
    pub fn health(&self) -> HealthLevel {
        self.health_pipeline.health()
    }

    #[must_use]
    pub fn remediation_stats(&self) -> RemediationStats {
        self.remediation.stats()
    }

    // --- Subscriptions ---

    /// Subscribes to every recorded metric.
    #[must_use]
    pub fn on_metric(
        &self,
        callback: impl Fn(&MetricRecord) + Send + Sync + 'static,
    ) -> Subscription {
        self.registry.subscribe_metric(callback)
    }

    /// Subscribes to emitted alerts.
    #[must_use]
    pub fn on_alert(&self, callback: impl Fn(&Alert) + Send + Sync + 'static) -> Subscription {
        self.registry.subscribe_alert(callback)
    }

    // --- Remediation ---

    /// Runs the emergency cleanup cascade now. Returns `Skipped` when a
    /// cascade is already in progress.
    pub async fn force_cleanup(&self) -> RemediationOutcome {
        self.remediation.run_cascade().await
    }

    /// Runs a routine optimization pass now.
    pub async fn force_optimization(&self) -> RemediationOutcome {
        self.remediation.optimize().await
    }

    // --- Lifecycle ---

    /// Starts the sampler and the periodic health check. A second call
    /// restarts both; `interval` overrides the configured sampling
    /// interval.
    pub fn start_monitoring(&self, interval: Option<Duration>) {
        self.sampler.start(interval.unwrap_or(self.sample_interval));
        self.health_check.start(self.health_interval);
    }

    /// Stops both periodic tasks. Safe to call when nothing is running.
    pub fn stop_monitoring(&self) {
        self.sampler.stop();
        self.health_check.stop();
    }

    #[must_use]
    pub fn is_monitoring(&self) -> bool {
        self.sampler.is_running()
    }

    fn lock_timers(&self) -> std::sync::MutexGuard<'_, HashMap<String, Instant>> {
        self.timers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}
