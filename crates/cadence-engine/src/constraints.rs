//! Resource constraints and the commit rule.

use cadence_core::config::BatchConfiguration;
use cadence_core::models::PerformanceMetrics;

/// Clamp into bounds, then back off for hot CPU, hot memory, and rate
/// limiting. The result is always within `[min_batch_size, max_batch_size]`.
pub fn apply_constraints(config: &BatchConfiguration, candidate: usize, metrics: &PerformanceMetrics) -> usize {
    let mut size = config.clamp(candidate);
    if metrics.cpu_pct > config.cpu_threshold_pct {
        size /= 2;
    }
    if metrics.memory_pct > config.memory_threshold_pct {
        size /= 2;
    }
    if metrics.rate_limit_hits > 0 {
        size = size * 3 / 4;
    }
    config.clamp(size)
}

/// A candidate replaces `current` only when it moves by more than
/// `max(1, 10% of current)`.
pub fn should_commit(current: usize, candidate: usize) -> bool {
    let delta = current.abs_diff(candidate) as f64;
    delta > (current as f64 * 0.1).max(1.0)
}
