//! Per-operation-type engine state.

use chrono::{DateTime, Utc};

use cadence_core::constants::HISTORY_CAPACITY;
use cadence_core::models::{BatchStrategy, PerformanceMetrics};
use cadence_core::BoundedHistory;

/// Mutable sizing state for one operation type.
#[derive(Debug, Clone)]
pub struct EngineState {
    pub current_batch_size: usize,
    pub active_strategy: BatchStrategy,
    pub circuit_breaker_active: bool,
    pub last_adaptation: DateTime<Utc>,
    pub history: BoundedHistory<PerformanceMetrics>,
    /// Smoothed score per strategy, in `BatchStrategy::ALL` order.
    strategy_scores: [f64; 4],
}

impl EngineState {
    pub fn new(initial_batch_size: usize, now: DateTime<Utc>) -> Self {
        Self {
            current_batch_size: initial_batch_size,
            active_strategy: BatchStrategy::default(),
            circuit_breaker_active: false,
            last_adaptation: now,
            history: BoundedHistory::new(HISTORY_CAPACITY),
            strategy_scores: [0.0; 4],
        }
    }

    pub fn strategy_score(&self, strategy: BatchStrategy) -> f64 {
        self.strategy_scores[slot(strategy)]
    }

    /// Fold `score` into the active strategy's moving average.
    pub fn record_strategy_score(&mut self, score: f64, alpha: f64) {
        let idx = slot(self.active_strategy);
        let previous = self.strategy_scores[idx];
        self.strategy_scores[idx] = alpha * score + (1.0 - alpha) * previous;
    }

    pub fn strategy_scores(&self) -> impl Iterator<Item = (BatchStrategy, f64)> + '_ {
        BatchStrategy::ALL
            .iter()
            .map(move |s| (*s, self.strategy_scores[slot(*s)]))
    }
}

fn slot(strategy: BatchStrategy) -> usize {
    match strategy {
        BatchStrategy::Conservative => 0,
        BatchStrategy::Aggressive => 1,
        BatchStrategy::Adaptive => 2,
        BatchStrategy::Balanced => 3,
    }
}
