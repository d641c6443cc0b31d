//! Per-type circuit breaker transitions.

use cadence_core::config::BatchConfiguration;
use cadence_core::models::PerformanceMetrics;

const RESOURCE_TRIP_PCT: f64 = 95.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerTransition {
    Opened,
    Closed,
    Unchanged,
}

/// At most one transition per observation.
pub fn evaluate(config: &BatchConfiguration, active: bool, metrics: &PerformanceMetrics) -> BreakerTransition {
    if !active && should_open(config, metrics) {
        BreakerTransition::Opened
    } else if active && should_close(config, metrics) {
        BreakerTransition::Closed
    } else {
        BreakerTransition::Unchanged
    }
}

fn should_open(config: &BatchConfiguration, metrics: &PerformanceMetrics) -> bool {
    metrics.error_rate > 2.0 * config.max_error_rate
        || metrics.rate_limit_hits > config.rate_limit_threshold
        || metrics.cpu_pct > RESOURCE_TRIP_PCT
        || metrics.memory_pct > RESOURCE_TRIP_PCT
}

fn should_close(config: &BatchConfiguration, metrics: &PerformanceMetrics) -> bool {
    metrics.error_rate < 0.5 * config.max_error_rate
        && metrics.rate_limit_hits == 0
        && metrics.cpu_pct < config.cpu_threshold_pct
        && metrics.memory_pct < config.memory_threshold_pct
}
