//! ResourceMonitor integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadence_core::config::MonitorConfig;
use cadence_core::errors::MonitorError;
use cadence_core::models::{AlertLevel, ResourceAlert, ResourceKind, SystemResources, Trend};
use cadence_core::traits::{Clock, ResourceSampler};
use cadence_monitor::{ExportFormat, MonitorSnapshot, ResourceMonitor};
use test_fixtures::{epoch, resources, ManualClock, Recorder, ScriptedSampler};

fn monitor() -> (Arc<ResourceMonitor>, Arc<ScriptedSampler>, Arc<ManualClock>) {
    let sampler = Arc::new(ScriptedSampler::new());
    let clock = Arc::new(ManualClock::new(epoch()));
    let monitor = ResourceMonitor::with_parts(MonitorConfig::default(), sampler.clone(), clock.clone());
    (Arc::new(monitor), sampler, clock)
}

/// Feed `cpu` values one second apart.
fn feed(monitor: &ResourceMonitor, clock: &ManualClock, cpus: &[f64]) {
    for cpu in cpus {
        clock.advance(Duration::from_secs(1));
        monitor.ingest(resources(*cpu, 30.0, clock.now()));
    }
}

#[test]
fn unusable_interval_falls_back_to_default() {
    let config = MonitorConfig {
        monitoring_interval_secs: -1.0,
        ..MonitorConfig::default()
    };
    let monitor = ResourceMonitor::with_parts(
        config,
        Arc::new(ScriptedSampler::new()),
        Arc::new(ManualClock::new(epoch())),
    );
    assert_eq!(monitor.config(), &MonitorConfig::default());
    assert_eq!(monitor.config().monitoring_interval(), MonitorConfig::default().monitoring_interval());
}

#[test]
fn critical_cpu_fires_exactly_one_alert() {
    let (monitor, sampler, clock) = monitor();
    let alerts: Arc<Recorder<ResourceAlert>> = Arc::default();
    let sink = alerts.clone();
    monitor.register_alert_callback(move |a| sink.push(a.clone()));

    sampler.push(resources(90.0, 30.0, clock.now()));
    monitor.sample();

    let alerts = alerts.take();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].level, AlertLevel::Critical);
    assert_eq!(alerts[0].resource, ResourceKind::Cpu);
    assert_eq!(alerts[0].current, 90.0);
}

#[test]
fn every_sample_is_judged_independently() {
    let (monitor, _, clock) = monitor();
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();
    monitor.register_alert_callback(move |_| {
        c.fetch_add(1, Ordering::SeqCst);
    });
    feed(&monitor, &clock, &[90.0, 90.0, 90.0]);
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn failed_collection_yields_zeroed_sample() {
    let (monitor, sampler, clock) = monitor();
    sampler.push_failure("permission denied");

    let sample = monitor.sample();

    assert_eq!(sample, SystemResources::zeroed(clock.now()));
    assert_eq!(monitor.sample_count(), 1);
}

#[test]
fn panicking_listener_does_not_stop_others() {
    let (monitor, _, clock) = monitor();
    let seen = Arc::new(AtomicUsize::new(0));
    monitor.register_callback(|_| panic!("listener bug"));
    let s = seen.clone();
    monitor.register_callback(move |_| {
        s.fetch_add(1, Ordering::SeqCst);
    });

    feed(&monitor, &clock, &[10.0, 20.0]);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
}

#[test]
fn baseline_appears_after_ten_samples() {
    let (monitor, _, clock) = monitor();
    feed(&monitor, &clock, &[10.0; 9]);
    assert!(monitor.current_metrics().baseline.is_none());

    feed(&monitor, &clock, &[20.0]);
    let baseline = monitor.current_metrics().baseline.unwrap();
    assert!((baseline.cpu_percent - 11.0).abs() < 1e-9);

    // Rolling: only the last ten count.
    feed(&monitor, &clock, &[20.0; 10]);
    let baseline = monitor.current_metrics().baseline.unwrap();
    assert!((baseline.cpu_percent - 20.0).abs() < 1e-9);
}

#[test]
fn peak_usage_tracks_maximum() {
    let (monitor, _, clock) = monitor();
    feed(&monitor, &clock, &[10.0, 75.0, 30.0]);
    let current = monitor.current_metrics();
    assert_eq!(current.peak_usage.cpu, 75.0);
    assert_eq!(current.system.cpu_percent, 30.0);
    assert!(!current.monitoring_active);
}

#[test]
fn network_speed_from_counter_deltas() {
    let (monitor, _, clock) = monitor();
    monitor.ingest(resources(10.0, 10.0, clock.now()));
    clock.advance(Duration::from_secs(2));
    monitor.ingest(SystemResources {
        network_bytes_sent: 1024 * 1024,
        network_bytes_received: 1024 * 1024,
        ..resources(10.0, 10.0, clock.now())
    });

    // 2 MiB over 2s = 8 Mbps
    let current = monitor.current_metrics();
    assert!((current.network_speed_mbps - 8.0).abs() < 1e-9);
    let availability = monitor.resource_availability();
    assert!((availability.network - (1.0 - 8.0 / 500.0)).abs() < 1e-9);
    assert!((availability.cpu - 0.9).abs() < 1e-9);
}

#[test]
fn availability_is_full_without_samples() {
    let (monitor, _, _) = monitor();
    let availability = monitor.resource_availability();
    assert_eq!(availability.cpu, 1.0);
    assert_eq!(availability.network, 1.0);
}

#[test]
fn trend_only_considers_window() {
    let (monitor, _, clock) = monitor();
    feed(&monitor, &clock, &[90.0, 90.0]);
    clock.advance(Duration::from_secs(600));
    feed(&monitor, &clock, &[10.0, 10.0, 30.0, 30.0]);

    let trend = monitor.performance_trend(Duration::from_secs(300));
    assert_eq!(trend.cpu, Trend::Increasing);
    assert_eq!(trend.memory, Trend::Stable);

    let wide = monitor.performance_trend(Duration::from_secs(3_600));
    assert_eq!(wide.cpu, Trend::Decreasing);
}

#[test]
fn exhaustion_forecast_needs_ten_rising_samples() {
    let (monitor, _, clock) = monitor();
    let rising: Vec<f64> = (0..9).map(|i| 40.0 + f64::from(i)).collect();
    feed(&monitor, &clock, &rising);
    assert_eq!(monitor.predict_resource_exhaustion().cpu, None);

    feed(&monitor, &clock, &[49.0]);
    let forecast = monitor.predict_resource_exhaustion();
    // 1 point per second from 49 to 85
    assert_eq!(forecast.cpu, Some(Duration::from_secs(36)));
    assert_eq!(forecast.memory, None);
}

#[test]
fn export_round_trips_through_json_and_yaml() {
    let (monitor, _, clock) = monitor();
    feed(&monitor, &clock, &[10.0, 20.0, 30.0]);
    let dir = tempfile::tempdir().unwrap();

    let json_path = dir.path().join("snapshot.json");
    monitor.export_to_file(&json_path, ExportFormat::Json).unwrap();
    let parsed: MonitorSnapshot =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(parsed.history.len(), 3);
    assert_eq!(parsed.peak_usage.cpu, 30.0);

    let yaml_path = dir.path().join("snapshot.yaml");
    monitor.export_to_file(&yaml_path, ExportFormat::Yaml).unwrap();
    let yaml = std::fs::read_to_string(&yaml_path).unwrap();
    assert!(yaml.contains("peak_usage"));
}

#[test]
fn export_to_missing_directory_fails() {
    let (monitor, _, _) = monitor();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("snapshot.json");
    assert!(monitor.export_to_file(&path, ExportFormat::Json).is_err());
}

#[test]
fn history_is_capped() {
    let (monitor, _, clock) = monitor();
    feed(&monitor, &clock, &vec![5.0; 1_005]);
    assert_eq!(monitor.sample_count(), 1_000);
    assert_eq!(monitor.history(3).len(), 3);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn start_and_stop_sampling_loop() {
    let sampler = Arc::new(ScriptedSampler::new());
    let clock = Arc::new(ManualClock::new(epoch()));
    for _ in 0..50 {
        sampler.push(resources(10.0, 10.0, clock.now()));
    }
    let config = MonitorConfig {
        monitoring_interval_secs: 0.01,
        ..Default::default()
    };
    let monitor = Arc::new(ResourceMonitor::with_parts(config, sampler, clock));

    monitor.start();
    monitor.start();
    assert!(monitor.is_running());
    tokio::time::sleep(Duration::from_millis(100)).await;
    monitor.stop().await;

    assert!(!monitor.is_running());
    let sampled = monitor.sample_count();
    assert!(sampled >= 2, "only {sampled} samples");
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(monitor.sample_count(), sampled);
}

/// Records which thread each sample was collected on.
struct ThreadTrackingSampler {
    threads: Recorder<std::thread::ThreadId>,
    clock: Arc<ManualClock>,
}

impl ResourceSampler for ThreadTrackingSampler {
    fn sample(&self) -> Result<SystemResources, MonitorError> {
        self.threads.push(std::thread::current().id());
        Ok(resources(10.0, 10.0, self.clock.now()))
    }
}

#[tokio::test(flavor = "current_thread")]
async fn sampling_loop_collects_off_the_runtime_thread() {
    let clock = Arc::new(ManualClock::new(epoch()));
    let sampler = Arc::new(ThreadTrackingSampler {
        threads: Recorder::default(),
        clock: clock.clone(),
    });
    let config = MonitorConfig {
        monitoring_interval_secs: 0.01,
        ..Default::default()
    };
    let monitor = Arc::new(ResourceMonitor::with_parts(config, sampler.clone(), clock));

    monitor.start();
    tokio::time::sleep(Duration::from_millis(50)).await;
    monitor.stop().await;

    let runtime_thread = std::thread::current().id();
    let threads = sampler.threads.snapshot();
    assert!(!threads.is_empty());
    assert!(threads.iter().all(|id| *id != runtime_thread));
    assert_eq!(monitor.sample_count(), threads.len());
}
