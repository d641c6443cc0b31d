//! ResourceMonitor: periodic sampling, alerting, and history analysis.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use cadence_core::config::MonitorConfig;
use cadence_core::constants::{BASELINE_WINDOW, HISTORY_CAPACITY, NETWORK_SPEED_CAPACITY};
use cadence_core::errors::MonitorError;
use cadence_core::events::ListenerRegistry;
use cadence_core::models::{ResourceAlert, SystemResources};
use cadence_core::tracing_setup::events;
use cadence_core::traits::{Clock, ResourceSampler, SystemClock};
use cadence_core::BoundedHistory;

use crate::analysis::{self, ExhaustionForecast, ResourceAvailability, TrendReport};
use crate::network::speed_mbps;
use crate::recommendations::{self, ResourceRecommendation};
use crate::sampler::SysinfoSampler;
use crate::snapshot::{CurrentMetrics, ExportFormat, MonitorSnapshot, PeakUsage};
use crate::thresholds;

struct MonitorState {
    history: BoundedHistory<SystemResources>,
    network_speeds: BoundedHistory<f64>,
    peak: PeakUsage,
    baseline: Option<SystemResources>,
}

struct SamplingTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Watches host resources and notifies listeners of samples and alerts.
pub struct ResourceMonitor {
    config: MonitorConfig,
    sampler: Arc<dyn ResourceSampler>,
    clock: Arc<dyn Clock>,
    state: RwLock<MonitorState>,
    sample_listeners: ListenerRegistry<SystemResources>,
    alert_listeners: ListenerRegistry<ResourceAlert>,
    task: Mutex<Option<SamplingTask>>,
}

impl ResourceMonitor {
    /// Monitor backed by the OS sampler and the system clock.
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_parts(config, Arc::new(SysinfoSampler::new()), Arc::new(SystemClock))
    }

    /// Invalid configuration is replaced by defaults.
    pub fn with_parts(config: MonitorConfig, sampler: Arc<dyn ResourceSampler>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config: config.validated_or_default(),
            sampler,
            clock,
            state: RwLock::new(MonitorState {
                history: BoundedHistory::new(HISTORY_CAPACITY),
                network_speeds: BoundedHistory::new(NETWORK_SPEED_CAPACITY),
                peak: PeakUsage::default(),
                baseline: None,
            }),
            sample_listeners: ListenerRegistry::new("resource_sample"),
            alert_listeners: ListenerRegistry::new("resource_alert"),
            task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Spawn the sampling loop on the current tokio runtime. No-op if
    /// already running.
    pub fn start(self: &Arc<Self>) {
        let mut task = self.task.lock();
        if task.is_some() {
            tracing::warn!("resource monitor already running");
            return;
        }
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let monitor = Arc::clone(self);
        let interval = self.config.monitoring_interval();
        let handle = tokio::spawn(async move {
            loop {
                let sampler = Arc::clone(&monitor.sampler);
                let collected = match tokio::task::spawn_blocking(move || sampler.sample()).await {
                    Ok(collected) => collected,
                    Err(e) => Err(MonitorError::CollectionFailed {
                        reason: format!("sampler task failed: {e}"),
                    }),
                };
                monitor.record(collected);
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        });
        *task = Some(SamplingTask { shutdown, handle });
        tracing::info!(
            interval_ms = interval.as_millis() as u64,
            "resource monitoring started"
        );
    }

    /// Signal the sampling loop and wait for it to exit.
    pub async fn stop(&self) {
        let task = self.task.lock().take();
        if let Some(task) = task {
            let _ = task.shutdown.send(true);
            if let Err(e) = task.handle.await {
                tracing::warn!(error = %e, "resource monitor task ended abnormally");
            }
            tracing::info!("resource monitoring stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.lock().is_some()
    }

    /// Collect and ingest one sample. Collection failures yield a zeroed
    /// snapshot rather than an error.
    pub fn sample(&self) -> SystemResources {
        self.record(self.sampler.sample())
    }

    fn record(&self, collected: Result<SystemResources, MonitorError>) -> SystemResources {
        let sample = match collected {
            Ok(sample) => sample,
            Err(e) => {
                events::emit_sample_failed(&e);
                SystemResources::zeroed(self.clock.now())
            }
        };
        self.ingest(sample.clone());
        sample
    }

    /// Record a sample obtained elsewhere: update history, peaks, baseline,
    /// and network speed, then notify listeners.
    pub fn ingest(&self, sample: SystemResources) {
        let alerts = thresholds::evaluate(&sample, &self.config.thresholds);
        {
            let mut state = self.state.write();
            if let Some(speed) = state.history.latest().and_then(|prev| speed_mbps(prev, &sample)) {
                state.network_speeds.push(speed);
            }
            state.peak.observe(&sample);
            state.history.push(sample.clone());
            if state.history.len() >= BASELINE_WINDOW {
                state.baseline = Some(baseline(&state.history, self.clock.now()));
            }
        }

        self.sample_listeners.notify(&sample);
        for alert in &alerts {
            events::emit_resource_alert(alert);
            self.alert_listeners.notify(alert);
        }
    }

    /// Called with every ingested sample.
    pub fn register_callback<F>(&self, listener: F)
    where
        F: Fn(&SystemResources) + Send + Sync + 'static,
    {
        self.sample_listeners.register(listener);
    }

    /// Called with every threshold alert.
    pub fn register_alert_callback<F>(&self, listener: F)
    where
        F: Fn(&ResourceAlert) + Send + Sync + 'static,
    {
        self.alert_listeners.register(listener);
    }

    pub fn current_metrics(&self) -> CurrentMetrics {
        let state = self.state.read();
        CurrentMetrics {
            system: state
                .history
                .latest()
                .cloned()
                .unwrap_or_else(|| SystemResources::zeroed(self.clock.now())),
            network_speed_mbps: state.network_speeds.latest().copied().unwrap_or(0.0),
            monitoring_active: self.is_running(),
            peak_usage: state.peak,
            baseline: state.baseline.clone(),
        }
    }

    pub fn resource_availability(&self) -> ResourceAvailability {
        let state = self.state.read();
        analysis::availability(
            state.history.latest(),
            state.network_speeds.latest().copied(),
            self.config.thresholds.network_mbps.critical,
        )
    }

    /// Trend over samples taken within `window` of now.
    pub fn performance_trend(&self, window: Duration) -> TrendReport {
        let cutoff = chrono::Duration::from_std(window)
            .ok()
            .and_then(|w| self.clock.now().checked_sub_signed(w));
        let state = self.state.read();
        let recent: Vec<&SystemResources> = state
            .history
            .iter()
            .filter(|s| cutoff.map_or(true, |c| s.timestamp >= c))
            .collect();
        analysis::trend(&recent)
    }

    pub fn predict_resource_exhaustion(&self) -> ExhaustionForecast {
        let state = self.state.read();
        let samples: Vec<&SystemResources> = state.history.iter().collect();
        analysis::forecast(&samples, &self.config.thresholds)
    }

    pub fn optimization_recommendations(&self) -> Vec<ResourceRecommendation> {
        let state = self.state.read();
        recommendations::recommend(
            state.history.latest(),
            &state.network_speeds,
            &self.config.thresholds,
        )
    }

    /// Most recent `n` samples, oldest first.
    pub fn history(&self, n: usize) -> Vec<SystemResources> {
        self.state.read().history.recent_vec(n)
    }

    pub fn sample_count(&self) -> usize {
        self.state.read().history.len()
    }

    pub fn export_snapshot(&self) -> MonitorSnapshot {
        let state = self.state.read();
        MonitorSnapshot {
            exported_at: self.clock.now(),
            history: state.history.to_vec(),
            network_speeds_mbps: state.network_speeds.to_vec(),
            peak_usage: state.peak,
            baseline: state.baseline.clone(),
        }
    }

    pub fn export_to_file(&self, path: &Path, format: ExportFormat) -> Result<(), MonitorError> {
        let snapshot = self.export_snapshot();
        snapshot.write_to(path, format)?;
        tracing::info!(
            path = %path.display(),
            samples = snapshot.history.len(),
            "resource snapshot exported"
        );
        Ok(())
    }
}

/// Average of the last ten samples. Counters and load keep the latest value.
fn baseline(history: &BoundedHistory<SystemResources>, now: chrono::DateTime<chrono::Utc>) -> SystemResources {
    let recent: Vec<&SystemResources> = history.recent(BASELINE_WINDOW).collect();
    let n = recent.len() as f64;
    let avg = |f: fn(&SystemResources) -> f64| recent.iter().map(|s| f(s)).sum::<f64>() / n;
    let latest = recent.last().map(|s| (*s).clone()).unwrap_or_else(|| SystemResources::zeroed(now));
    SystemResources {
        cpu_percent: avg(|s| s.cpu_percent),
        memory_percent: avg(|s| s.memory_percent),
        memory_available_mb: avg(|s| s.memory_available_mb),
        disk_usage_percent: avg(|s| s.disk_usage_percent),
        timestamp: now,
        ..latest
    }
}
