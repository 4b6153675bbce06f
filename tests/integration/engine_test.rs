//! End-to-end tests through the public `PerfMonitor` facade.

#![allow(clippy::expect_used)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use vitals::application::config::{EngineConfig, RetentionConfig, SamplingConfig};
use vitals::domain::entities::metric::MetricUnit;
use vitals::domain::value_objects::{AlertLevel, HealthLevel, Trend};
use vitals::infrastructure::probes::{FixedProbe, NoopProbe};
use vitals::PerfMonitor;

fn fast_config() -> EngineConfig {
    EngineConfig {
        sampling: SamplingConfig {
            interval_secs: 1,
            health_check_interval_secs: 1,
        },
        ..EngineConfig::default()
    }
}

#[tokio::test(start_paused = true)]
async fn climbing_usage_raises_an_alert() {
    let probe = Arc::new(FixedProbe::new([50.0, 60.0, 70.0, 80.0, 95.0]));
    let monitor = PerfMonitor::new(&fast_config(), probe, Vec::new(), None);

    let alerts = Arc::new(Mutex::new(Vec::new()));
    let sub = {
        let alerts = Arc::clone(&alerts);
        monitor.on_alert(move |alert| {
            alerts
                .lock()
                .expect("lock")
                .push((alert.level, alert.channel.clone()));
        })
    };

    monitor.start_monitoring(None);
    tokio::time::sleep(Duration::from_secs(10)).await;
    monitor.stop_monitoring();

    let seen = alerts.lock().expect("lock").clone();
    assert!(!seen.is_empty(), "expected at least one alert");
    assert!(seen.iter().all(|(_, channel)| channel == "memory"));
    // The 80% sample breaches warning first; later criticals are inside
    // the cooldown window.
    assert_eq!(seen[0].0, AlertLevel::Warning);
    sub.cancel();
}

#[tokio::test(start_paused = true)]
async fn sustained_climb_is_classified_increasing() {
    let script: Vec<f64> = (0..12).map(|i| 20.0 + 5.0 * f64::from(i)).collect();
    let probe = Arc::new(FixedProbe::new(script));
    let monitor = PerfMonitor::new(&fast_config(), probe, Vec::new(), None);

    monitor.start_monitoring(None);
    tokio::time::sleep(Duration::from_secs(15)).await;
    monitor.stop_monitoring();

    let report = monitor.memory_stats().expect("memory report");
    assert_eq!(report.trend, Trend::Increasing);
    assert!(!report.recent_history.is_empty());
}

#[tokio::test(start_paused = true)]
async fn lifecycle_is_idempotent() {
    let monitor = PerfMonitor::new(
        &fast_config(),
        Arc::new(NoopProbe::new()),
        Vec::new(),
        None,
    );

    monitor.start_monitoring(Some(Duration::from_secs(1)));
    monitor.start_monitoring(Some(Duration::from_secs(1)));
    assert!(monitor.is_monitoring());

    monitor.stop_monitoring();
    monitor.stop_monitoring();
    assert!(!monitor.is_monitoring());

    // Restart works after a stop.
    monitor.start_monitoring(None);
    assert!(monitor.is_monitoring());
    monitor.stop_monitoring();
}

#[tokio::test]
async fn measure_operation_is_transparent_to_the_caller() {
    let monitor = PerfMonitor::new(
        &EngineConfig::default(),
        Arc::new(NoopProbe::new()),
        Vec::new(),
        None,
    );

    let ok: Result<&str, String> = monitor
        .measure_operation("parse", async { Ok("parsed") })
        .await;
    assert_eq!(ok.expect("ok"), "parsed");

    let err: Result<(), String> = monitor
        .measure_operation("parse", async { Err("bad input".to_string()) })
        .await;
    assert_eq!(err.expect_err("err"), "bad input");

    let stats = monitor.stats(None);
    assert_eq!(stats.total_metrics, 2);
    assert!((stats.error_rate_pct - 50.0).abs() < f64::EPSILON);
    let parse = stats.per_operation.get("parse").expect("parse stats");
    assert_eq!(parse.count, 2);
}

#[tokio::test]
async fn store_evicts_oldest_once_at_capacity() {
    let config = EngineConfig {
        retention: RetentionConfig {
            metric_capacity: 5,
            ..RetentionConfig::default()
        },
        ..EngineConfig::default()
    };
    let monitor = PerfMonitor::new(&config, Arc::new(NoopProbe::new()), Vec::new(), None);

    for i in 0..20 {
        monitor.record_metric("op", f64::from(i), MetricUnit::Milliseconds, HashMap::new());
    }

    let stats = monitor.stats(None);
    assert_eq!(stats.total_metrics, 5);
    // Only the newest five survive: 15..=19, mean 17.
    assert!((stats.average_duration_ms - 17.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn metric_subscribers_see_every_record() {
    let monitor = PerfMonitor::new(
        &EngineConfig::default(),
        Arc::new(NoopProbe::new()),
        Vec::new(),
        None,
    );
    let count = Arc::new(AtomicUsize::new(0));
    let sub = {
        let count = Arc::clone(&count);
        monitor.on_metric(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    };

    monitor.record_metric("a", 1.0, MetricUnit::Count, HashMap::new());
    monitor.start_timer("b");
    let _ = monitor.end_timer("b", HashMap::new());

    assert_eq!(count.load(Ordering::SeqCst), 2);
    sub.cancel();

    monitor.record_metric("c", 1.0, MetricUnit::Count, HashMap::new());
    assert_eq!(count.load(Ordering::SeqCst), 2, "cancelled subscriber is silent");
}

#[tokio::test]
async fn health_degrades_with_slow_failing_operations() {
    let monitor = PerfMonitor::new(
        &EngineConfig::default(),
        Arc::new(NoopProbe::new()),
        Vec::new(),
        None,
    );
    assert_eq!(monitor.health(), HealthLevel::Excellent);

    for _ in 0..10 {
        let _: Result<(), String> = monitor
            .measure_operation("slow_op", async {
                Err("downstream timeout".to_string())
            })
            .await;
    }

    // 100% error rate dominates regardless of latency.
    assert_eq!(monitor.health(), HealthLevel::Poor);
}
