//! Weighted performance score in [0, 1].

use cadence_core::config::BatchConfiguration;
use cadence_core::constants::THROUGHPUT_WINDOW;
use cadence_core::models::PerformanceMetrics;
use cadence_core::BoundedHistory;

pub const SUCCESS_WEIGHT: f64 = 0.30;
pub const RESPONSE_WEIGHT: f64 = 0.25;
pub const THROUGHPUT_WEIGHT: f64 = 0.20;
pub const RESOURCE_WEIGHT: f64 = 0.15;
pub const RATE_LIMIT_WEIGHT: f64 = 0.10;

/// Score `metrics` against the configured targets. Throughput is
/// normalized by the best throughput in the recent history window.
pub fn performance_score(
    config: &BatchConfiguration,
    metrics: &PerformanceMetrics,
    history: &BoundedHistory<PerformanceMetrics>,
) -> f64 {
    let score = SUCCESS_WEIGHT * metrics.success_rate.clamp(0.0, 1.0)
        + RESPONSE_WEIGHT * response_score(config, metrics)
        + THROUGHPUT_WEIGHT * throughput_score(metrics, history)
        + RESOURCE_WEIGHT * resource_score(metrics)
        + RATE_LIMIT_WEIGHT * rate_limit_score(config, metrics);
    score.clamp(0.0, 1.0)
}

pub fn response_score(config: &BatchConfiguration, metrics: &PerformanceMetrics) -> f64 {
    (1.0 - metrics.avg_response_time_ms / config.target_response_time_ms).max(0.0)
}

pub fn throughput_score(metrics: &PerformanceMetrics, history: &BoundedHistory<PerformanceMetrics>) -> f64 {
    let best = history
        .recent(THROUGHPUT_WINDOW)
        .map(|m| m.throughput_ops_per_sec)
        .fold(0.0_f64, f64::max);
    (metrics.throughput_ops_per_sec / best.max(1.0)).clamp(0.0, 1.0)
}

pub fn resource_score(metrics: &PerformanceMetrics) -> f64 {
    let cpu = (1.0 - metrics.cpu_pct / 100.0).max(0.0);
    let memory = (1.0 - metrics.memory_pct / 100.0).max(0.0);
    (cpu + memory) / 2.0
}

/// A zero threshold tolerates no hits at all.
pub fn rate_limit_score(config: &BatchConfiguration, metrics: &PerformanceMetrics) -> f64 {
    if config.rate_limit_threshold == 0 {
        return if metrics.rate_limit_hits == 0 { 1.0 } else { 0.0 };
    }
    (1.0 - f64::from(metrics.rate_limit_hits) / f64::from(config.rate_limit_threshold)).max(0.0)
}
