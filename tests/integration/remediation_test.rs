//! Remediation behavior through the public facade: critical breaches
//! trigger the cascade, concurrent triggers are dropped, and host hooks
//! are invoked.

#![allow(clippy::expect_used)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use vitals::application::config::{EngineConfig, SamplingConfig};
use vitals::application::services::remediation::RemediationOutcome;
use vitals::domain::ports::reclaimer::{
    AllocatorHint, ReclaimError, ReclaimPressure, ReclaimReport, ResourceReclaimer,
};
use vitals::infrastructure::probes::{FixedProbe, NoopProbe};
use vitals::PerfMonitor;

struct RecordingReclaimer {
    calls: Arc<AtomicUsize>,
    pressures: Arc<std::sync::Mutex<Vec<ReclaimPressure>>>,
}

#[async_trait]
impl ResourceReclaimer for RecordingReclaimer {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn reclaim(&self, pressure: ReclaimPressure) -> Result<ReclaimReport, ReclaimError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pressures.lock().expect("lock").push(pressure);
        Ok(ReclaimReport {
            freed_bytes: 1024,
            entries_evicted: 8,
        })
    }
}

struct BlockingReclaimer {
    entered: Arc<tokio::sync::Notify>,
    proceed: Arc<tokio::sync::Notify>,
}

#[async_trait]
impl ResourceReclaimer for BlockingReclaimer {
    fn name(&self) -> &'static str {
        "blocking"
    }

    async fn reclaim(&self, _: ReclaimPressure) -> Result<ReclaimReport, ReclaimError> {
        self.entered.notify_one();
        self.proceed.notified().await;
        Ok(ReclaimReport::default())
    }
}

#[tokio::test(start_paused = true)]
async fn critical_usage_triggers_the_emergency_cascade() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pressures = Arc::new(std::sync::Mutex::new(Vec::new()));
    let reclaimer = RecordingReclaimer {
        calls: Arc::clone(&calls),
        pressures: Arc::clone(&pressures),
    };
    let config = EngineConfig {
        sampling: SamplingConfig {
            interval_secs: 1,
            health_check_interval_secs: 3600,
        },
        ..EngineConfig::default()
    };
    let monitor = PerfMonitor::new(
        &config,
        Arc::new(FixedProbe::new([95.0])),
        vec![Box::new(reclaimer)],
        None,
    );

    monitor.start_monitoring(None);
    tokio::time::sleep(Duration::from_secs(3)).await;
    monitor.stop_monitoring();

    assert!(calls.load(Ordering::SeqCst) >= 1);
    let seen = pressures.lock().expect("lock").clone();
    assert!(seen.contains(&ReclaimPressure::Emergency));
    assert!(monitor.remediation_stats().runs >= 1);
}

#[tokio::test]
async fn concurrent_cleanup_is_skipped_not_queued() {
    let entered = Arc::new(tokio::sync::Notify::new());
    let proceed = Arc::new(tokio::sync::Notify::new());
    let monitor = Arc::new(PerfMonitor::new(
        &EngineConfig::default(),
        Arc::new(NoopProbe::new()),
        vec![Box::new(BlockingReclaimer {
            entered: Arc::clone(&entered),
            proceed: Arc::clone(&proceed),
        })],
        None,
    ));

    let first = {
        let monitor = Arc::clone(&monitor);
        tokio::spawn(async move { monitor.force_cleanup().await })
    };
    entered.notified().await;

    assert_eq!(monitor.force_cleanup().await, RemediationOutcome::Skipped);
    assert_eq!(
        monitor.force_optimization().await,
        RemediationOutcome::Skipped
    );

    proceed.notify_one();
    assert_eq!(first.await.expect("join"), RemediationOutcome::Started);

    let stats = monitor.remediation_stats();
    assert_eq!(stats.runs, 1);
    assert_eq!(stats.skips, 2);

    // Once the cascade finishes a new trigger runs again.
    assert_eq!(monitor.force_optimization().await, RemediationOutcome::Started);
}

#[tokio::test]
async fn allocator_hint_runs_in_the_emergency_cascade_only() {
    let hint_calls = Arc::new(AtomicUsize::new(0));
    let hint: AllocatorHint = {
        let hint_calls = Arc::clone(&hint_calls);
        Box::new(move || {
            hint_calls.fetch_add(1, Ordering::SeqCst);
        })
    };
    let monitor = PerfMonitor::new(
        &EngineConfig::default(),
        Arc::new(NoopProbe::new()),
        Vec::new(),
        Some(hint),
    );

    monitor.force_optimization().await;
    assert_eq!(hint_calls.load(Ordering::SeqCst), 0);

    monitor.force_cleanup().await;
    assert_eq!(hint_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn optimization_uses_routine_pressure() {
    let calls = Arc::new(AtomicUsize::new(0));
    let pressures = Arc::new(std::sync::Mutex::new(Vec::new()));
    let monitor = PerfMonitor::new(
        &EngineConfig::default(),
        Arc::new(NoopProbe::new()),
        vec![Box::new(RecordingReclaimer {
            calls: Arc::clone(&calls),
            pressures: Arc::clone(&pressures),
        })],
        None,
    );

    assert_eq!(monitor.force_optimization().await, RemediationOutcome::Started);

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let seen = pressures.lock().expect("lock").clone();
    assert_eq!(seen, vec![ReclaimPressure::Routine]);
}

#[tokio::test]
async fn failing_reclaimer_is_counted_and_skipped_over() {
    struct FailingReclaimer;

    #[async_trait]
    impl ResourceReclaimer for FailingReclaimer {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn reclaim(&self, _: ReclaimPressure) -> Result<ReclaimReport, ReclaimError> {
            Err(ReclaimError::Failed("cache busy".to_string()))
        }
    }

    let calls = Arc::new(AtomicUsize::new(0));
    let pressures = Arc::new(std::sync::Mutex::new(Vec::new()));
    let monitor = PerfMonitor::new(
        &EngineConfig::default(),
        Arc::new(NoopProbe::new()),
        vec![
            Box::new(FailingReclaimer),
            Box::new(RecordingReclaimer {
                calls: Arc::clone(&calls),
                pressures,
            }),
        ],
        None,
    );

    assert_eq!(monitor.force_cleanup().await, RemediationOutcome::Started);

    assert_eq!(calls.load(Ordering::SeqCst), 1, "later step still ran");
    assert_eq!(monitor.remediation_stats().step_failures, 1);
}
