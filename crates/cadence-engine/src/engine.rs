//! AdaptiveBatchingEngine: per-type batch sizing.

use std::collections::BTreeMap;
use std::sync::Arc;

use dashmap::DashMap;

use cadence_core::config::BatchConfiguration;
use cadence_core::constants::{BASELINE_WINDOW, STRATEGY_EMA_ALPHA, SUMMARY_WINDOW};
use cadence_core::models::{BatchStrategy, Operation, OperationType, PerformanceMetrics, Priority};
use cadence_core::tracing_setup::events;
use cadence_core::traits::{Clock, SystemClock};

use crate::breaker::{self, BreakerTransition};
use crate::constraints::{apply_constraints, should_commit};
use crate::recommendation::{self, BatchRecommendation};
use crate::scoring::performance_score;
use crate::sequence::partition;
use crate::state::EngineState;
use crate::strategies::{self, SizingInput};
use crate::summary::TypeSummary;

/// Computes and commits batch sizes per operation type.
///
/// State for each type lives behind its own map entry, so updates for one
/// type are serialized while different types proceed independently.
pub struct AdaptiveBatchingEngine {
    config: BatchConfiguration,
    states: DashMap<OperationType, EngineState>,
    clock: Arc<dyn Clock>,
}

impl AdaptiveBatchingEngine {
    pub fn new(config: BatchConfiguration) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Invalid configuration is replaced by defaults.
    pub fn with_clock(config: BatchConfiguration, clock: Arc<dyn Clock>) -> Self {
        let config = config.validated_or_default();
        let now = clock.now();
        let states = DashMap::new();
        for op in OperationType::ALL {
            states.insert(op, EngineState::new(config.min_batch_size, now));
        }
        Self {
            config,
            states,
            clock,
        }
    }

    pub fn config(&self) -> &BatchConfiguration {
        &self.config
    }

    /// Compute, and possibly commit, the batch size for `op`.
    ///
    /// An open circuit breaker short-circuits to `min_batch_size` without
    /// touching the committed size. Otherwise the active strategy proposes
    /// a size, constraints apply, and the proposal is committed only if it
    /// clears the hysteresis band. Returns the committed size.
    pub fn calculate_optimal_batch_size(
        &self,
        op: OperationType,
        metrics: &PerformanceMetrics,
        pending: usize,
    ) -> usize {
        let mut state = self.state_mut(op);
        self.size_locked(op, &mut state, metrics, pending)
    }

    /// Sizing step shared by calculation and recommendation; the caller
    /// holds the type's entry.
    fn size_locked(
        &self,
        op: OperationType,
        state: &mut EngineState,
        metrics: &PerformanceMetrics,
        pending: usize,
    ) -> usize {
        if state.circuit_breaker_active {
            return self.config.min_batch_size;
        }

        let score = performance_score(&self.config, metrics, &state.history);
        let current = state.current_batch_size;
        let proposed = strategies::propose(
            state.active_strategy,
            &self.config,
            SizingInput {
                current,
                score,
                metrics,
                pending,
            },
        );
        let candidate = apply_constraints(&self.config, proposed, metrics);

        if should_commit(current, candidate) {
            state.current_batch_size = candidate;
            state.last_adaptation = self.clock.now();
            events::emit_batch_size_adapted(op, state.active_strategy, current, candidate, score);
        }
        state.current_batch_size
    }

    /// Record an observation, evaluate the breaker, and update the active
    /// strategy's smoothed score.
    pub fn update_performance_metrics(&self, op: OperationType, metrics: PerformanceMetrics) {
        let mut state = self.state_mut(op);

        match breaker::evaluate(&self.config, state.circuit_breaker_active, &metrics) {
            BreakerTransition::Opened => {
                state.circuit_breaker_active = true;
                events::emit_engine_breaker_opened(op, metrics.error_rate, metrics.rate_limit_hits);
            }
            BreakerTransition::Closed => {
                state.circuit_breaker_active = false;
                events::emit_engine_breaker_closed(op);
            }
            BreakerTransition::Unchanged => {}
        }

        let score = performance_score(&self.config, &metrics, &state.history);
        state.record_strategy_score(score, STRATEGY_EMA_ALPHA);
        state.history.push(metrics);
    }

    pub fn get_batch_recommendation(
        &self,
        op: OperationType,
        metrics: &PerformanceMetrics,
        pending: usize,
        priority: Priority,
    ) -> BatchRecommendation {
        let mut state = self.state_mut(op);
        let previous_size = state.current_batch_size;
        let batch_size = self.size_locked(op, &mut state, metrics, pending);

        let score = performance_score(&self.config, metrics, &state.history);
        let recent_scores: Vec<f64> = if state.history.len() < BASELINE_WINDOW {
            Vec::new()
        } else {
            state
                .history
                .recent(BASELINE_WINDOW)
                .map(|m| performance_score(&self.config, m, &state.history))
                .collect()
        };

        BatchRecommendation {
            batch_size,
            previous_batch_size: previous_size,
            confidence: recommendation::confidence(&recent_scores, BASELINE_WINDOW),
            recommended_strategy: recommendation::recommend_strategy(
                &self.config,
                metrics,
                state.strategy_scores(),
            ),
            reasoning: recommendation::reasons(
                &self.config,
                state.circuit_breaker_active,
                metrics,
                score,
            ),
            circuit_breaker_active: state.circuit_breaker_active,
            performance_score: score,
            estimated_completion: recommendation::estimate_completion(
                batch_size,
                pending,
                metrics.throughput_ops_per_sec,
            ),
            resource_impact: recommendation::resource_impact(batch_size, previous_size),
            priority,
        }
    }

    /// Size `operations` from the type's latest observation and split them
    /// into consecutive batches.
    pub fn optimize_batch_sequence(&self, operations: &[Operation], op: OperationType) -> Vec<Vec<Operation>> {
        if operations.is_empty() {
            return Vec::new();
        }
        let metrics = self
            .latest_metrics(op)
            .unwrap_or_else(|| PerformanceMetrics::at(self.clock.now()));
        let size = self.calculate_optimal_batch_size(op, &metrics, operations.len());
        partition(operations, size)
    }

    pub fn set_active_strategy(&self, op: OperationType, strategy: BatchStrategy) {
        self.state_mut(op).active_strategy = strategy;
    }

    pub fn active_strategy(&self, op: OperationType) -> BatchStrategy {
        self.state(op).active_strategy
    }

    pub fn current_batch_size(&self, op: OperationType) -> usize {
        self.state(op).current_batch_size
    }

    pub fn is_circuit_open(&self, op: OperationType) -> bool {
        self.state(op).circuit_breaker_active
    }

    pub fn latest_metrics(&self, op: OperationType) -> Option<PerformanceMetrics> {
        self.state(op).history.latest().cloned()
    }

    pub fn history_len(&self, op: OperationType) -> usize {
        self.state(op).history.len()
    }

    /// Summary for every type with at least one observation.
    pub fn performance_summary(&self) -> BTreeMap<OperationType, TypeSummary> {
        let mut summary = BTreeMap::new();
        for entry in self.states.iter() {
            let state = entry.value();
            if state.history.is_empty() {
                continue;
            }
            let recent: Vec<&PerformanceMetrics> = state.history.recent(SUMMARY_WINDOW).collect();
            let n = recent.len() as f64;
            summary.insert(
                *entry.key(),
                TypeSummary {
                    current_batch_size: state.current_batch_size,
                    active_strategy: state.active_strategy,
                    circuit_breaker_active: state.circuit_breaker_active,
                    avg_response_time_ms: recent.iter().map(|m| m.avg_response_time_ms).sum::<f64>() / n,
                    avg_throughput: recent.iter().map(|m| m.throughput_ops_per_sec).sum::<f64>() / n,
                    avg_success_rate: recent.iter().map(|m| m.success_rate).sum::<f64>() / n,
                    measurements: state.history.len(),
                    last_adaptation: state.last_adaptation,
                },
            );
        }
        summary
    }

    fn state(&self, op: OperationType) -> dashmap::mapref::one::Ref<'_, OperationType, EngineState> {
        match self.states.get(&op) {
            Some(state) => state,
            None => self.state_mut(op).downgrade(),
        }
    }

    fn state_mut(&self, op: OperationType) -> dashmap::mapref::one::RefMut<'_, OperationType, EngineState> {
        self.states
            .entry(op)
            .or_insert_with(|| EngineState::new(self.config.min_batch_size, self.clock.now()))
    }
}
