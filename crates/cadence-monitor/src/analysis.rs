//! Availability, trend, and exhaustion analysis over sample history.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use cadence_core::config::ResourceThresholds;
use cadence_core::constants::{BASELINE_WINDOW, TREND_BAND};
use cadence_core::models::{SystemResources, Trend};

/// Free capacity per resource, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceAvailability {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
    pub network: f64,
}

impl ResourceAvailability {
    pub const FULL: Self = Self {
        cpu: 1.0,
        memory: 1.0,
        disk: 1.0,
        network: 1.0,
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendReport {
    pub cpu: Trend,
    pub memory: Trend,
    pub disk: Trend,
}

impl TrendReport {
    pub const STABLE: Self = Self {
        cpu: Trend::Stable,
        memory: Trend::Stable,
        disk: Trend::Stable,
    };
}

/// Estimated time until each resource reaches its critical threshold.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ExhaustionForecast {
    pub cpu: Option<Duration>,
    pub memory: Option<Duration>,
    pub disk: Option<Duration>,
}

pub fn availability(
    latest: Option<&SystemResources>,
    latest_speed_mbps: Option<f64>,
    network_critical_mbps: f64,
) -> ResourceAvailability {
    let Some(latest) = latest else {
        return ResourceAvailability::FULL;
    };
    let free = |pct: f64| ((100.0 - pct) / 100.0).clamp(0.0, 1.0);
    let network = match latest_speed_mbps {
        Some(speed) if network_critical_mbps > 0.0 => (1.0 - speed / network_critical_mbps).clamp(0.0, 1.0),
        _ => 1.0,
    };
    ResourceAvailability {
        cpu: free(latest.cpu_percent),
        memory: free(latest.memory_percent),
        disk: free(latest.disk_usage_percent),
        network,
    }
}

/// Trend of `samples` (oldest first). Fewer than two samples is stable.
pub fn trend(samples: &[&SystemResources]) -> TrendReport {
    if samples.len() < 2 {
        return TrendReport::STABLE;
    }
    let series = |f: fn(&SystemResources) -> f64| samples.iter().map(|s| f(s)).collect::<Vec<_>>();
    TrendReport {
        cpu: classify(&series(|s| s.cpu_percent)),
        memory: classify(&series(|s| s.memory_percent)),
        disk: classify(&series(|s| s.disk_usage_percent)),
    }
}

/// Compare the first-half and second-half averages with a ±5 point band.
pub fn classify(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    let (first, second) = values.split_at(values.len() / 2);
    let mean = |v: &[f64]| v.iter().sum::<f64>() / v.len() as f64;
    let (first_avg, second_avg) = (mean(first), mean(second));
    if second_avg > first_avg + TREND_BAND {
        Trend::Increasing
    } else if second_avg < first_avg - TREND_BAND {
        Trend::Decreasing
    } else {
        Trend::Stable
    }
}

/// Linear extrapolation over the last ten samples.
pub fn forecast(samples: &[&SystemResources], thresholds: &ResourceThresholds) -> ExhaustionForecast {
    if samples.len() < BASELINE_WINDOW {
        return ExhaustionForecast::default();
    }
    let recent = &samples[samples.len() - BASELINE_WINDOW..];
    let times: Vec<f64> = recent
        .iter()
        .map(|s| s.timestamp.timestamp_millis() as f64 / 1000.0)
        .collect();
    let series = |f: fn(&SystemResources) -> f64| recent.iter().map(|s| f(s)).collect::<Vec<_>>();
    ExhaustionForecast {
        cpu: time_to_critical(&series(|s| s.cpu_percent), &times, thresholds.cpu.critical),
        memory: time_to_critical(&series(|s| s.memory_percent), &times, thresholds.memory.critical),
        disk: time_to_critical(&series(|s| s.disk_usage_percent), &times, thresholds.disk.critical),
    }
}

fn time_to_critical(values: &[f64], times: &[f64], critical: f64) -> Option<Duration> {
    let mut rates = Vec::with_capacity(values.len().saturating_sub(1));
    for i in 1..values.len() {
        let dt = times[i] - times[i - 1];
        if dt <= 0.0 {
            return None;
        }
        rates.push((values[i] - values[i - 1]) / dt);
    }
    if rates.is_empty() {
        return None;
    }
    let avg_rate = rates.iter().sum::<f64>() / rates.len() as f64;
    if avg_rate <= 0.0 {
        return None;
    }
    let current = values[values.len() - 1];
    let seconds = (critical - current) / avg_rate;
    if seconds <= 0.0 {
        return None;
    }
    Duration::try_from_secs_f64(seconds).ok()
}
