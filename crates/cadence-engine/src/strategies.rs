//! Sizing rules per strategy. Pure functions of their inputs.

use cadence_core::config::BatchConfiguration;
use cadence_core::models::{BatchStrategy, PerformanceMetrics};

/// Inputs shared by every sizing rule.
#[derive(Debug, Clone, Copy)]
pub struct SizingInput<'a> {
    pub current: usize,
    pub score: f64,
    pub metrics: &'a PerformanceMetrics,
    pub pending: usize,
}

/// Propose the next batch size before constraints and hysteresis.
pub fn propose(strategy: BatchStrategy, config: &BatchConfiguration, input: SizingInput<'_>) -> usize {
    match strategy {
        BatchStrategy::Conservative => conservative(config, input),
        BatchStrategy::Aggressive => aggressive(config, input),
        BatchStrategy::Adaptive => adaptive(config, input),
        BatchStrategy::Balanced => balanced(config, input),
    }
}

fn shrink(current: usize, by: usize, floor: usize) -> usize {
    current.saturating_sub(by).max(floor)
}

/// Small steps, capped at half the maximum.
fn conservative(config: &BatchConfiguration, input: SizingInput<'_>) -> usize {
    let error_rate = input.metrics.error_rate;
    if input.score > 0.9 && error_rate < 0.01 {
        (input.current + 5).min(config.max_batch_size / 2)
    } else if input.score < 0.7 || error_rate > 0.03 {
        shrink(input.current, 10, config.min_batch_size)
    } else {
        input.current
    }
}

/// Large steps, growing only while the backlog dwarfs the batch.
fn aggressive(config: &BatchConfiguration, input: SizingInput<'_>) -> usize {
    if input.score > 0.8 && input.pending > input.current.saturating_mul(2) {
        (input.current + 20).min(config.max_batch_size)
    } else if input.score < 0.6 {
        shrink(input.current, 15, config.min_batch_size)
    } else {
        input.current
    }
}

/// Proportional steps.
fn adaptive(config: &BatchConfiguration, input: SizingInput<'_>) -> usize {
    let current = input.current;
    if input.score > 0.85 {
        (current + percent_of(current, 0.2)).min(config.max_batch_size)
    } else if input.score < 0.6 {
        shrink(current, percent_of(current, 0.3), config.min_batch_size)
    } else if input.score < 0.75 {
        shrink(current, percent_of(current, 0.1), config.min_batch_size)
    } else {
        current
    }
}

/// Grows only while responses stay well under target; capped at 75% of max.
fn balanced(config: &BatchConfiguration, input: SizingInput<'_>) -> usize {
    let fast = input.metrics.avg_response_time_ms < 0.8 * config.target_response_time_ms;
    if input.score > 0.8 && fast {
        let cap = percent_of(config.max_batch_size, 0.75);
        (input.current + 10).min(cap)
    } else if input.score < 0.65 {
        shrink(input.current, 8, config.min_batch_size)
    } else {
        input.current
    }
}

fn percent_of(value: usize, fraction: f64) -> usize {
    (value as f64 * fraction).floor() as usize
}
