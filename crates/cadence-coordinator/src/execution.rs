//! Running one job: sizing, sequential batch execution, aggregation, and
//! feedback to the engine and predictor.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadence_core::config::CoordinatorConfig;
use cadence_core::errors::{CoordinatorError, ExecutorError};
use cadence_core::events::{BatchOptimizedEvent, JobEventDispatcher, SizeSource};
use cadence_core::models::{
    BatchExecutionResult, BatchJob, BatchOutcome, JobStatus, Operation, OperationType,
    OptimizationTarget, PerformanceMetrics, PredictionFeatures, Priority,
};
use cadence_core::traits::{CancellationToken, Clock, PredictionProvider, WorkExecutor};
use cadence_engine::sequence::batch_ranges;
use cadence_engine::AdaptiveBatchingEngine;
use cadence_monitor::ResourceMonitor;

/// Everything a worker needs, detached from the job table.
#[derive(Debug, Clone)]
pub struct JobTicket {
    pub job_id: String,
    pub operation_type: OperationType,
    pub operations: Arc<[Operation]>,
    pub priority: Priority,
    pub timeout: Duration,
    pub cancel: CancellationToken,
}

impl From<&BatchJob> for JobTicket {
    fn from(job: &BatchJob) -> Self {
        Self {
            job_id: job.job_id.clone(),
            operation_type: job.operation_type,
            operations: Arc::clone(&job.operations),
            priority: job.priority,
            timeout: job.timeout,
            cancel: job.cancel.clone(),
        }
    }
}

/// How a worker ended.
#[derive(Debug)]
pub enum JobOutcome {
    /// Every batch was attempted.
    Finished(BatchExecutionResult),
    /// Stopped by request between batches. Skipped operations are not
    /// failures.
    Cancelled {
        result: BatchExecutionResult,
        error: CoordinatorError,
    },
    /// Timed out or crashed before producing a result.
    Aborted {
        error: CoordinatorError,
        elapsed: Duration,
    },
}

/// Terminal job fields derived from an outcome.
#[derive(Debug)]
pub struct Settled {
    pub status: JobStatus,
    pub result: BatchExecutionResult,
    pub error: Option<String>,
}

impl JobOutcome {
    pub fn settle(self, job_id: &str, operation_count: usize) -> Settled {
        match self {
            Self::Finished(result) if result.success => Settled {
                status: JobStatus::Completed,
                result,
                error: None,
            },
            Self::Finished(result) => {
                let error = if result.error_details.is_empty() {
                    format!("{} operations failed", result.failed_count)
                } else {
                    result.error_details.join("; ")
                };
                Settled {
                    status: JobStatus::Failed,
                    result,
                    error: Some(error),
                }
            }
            Self::Cancelled { result, error } => Settled {
                status: JobStatus::Cancelled,
                result,
                error: Some(error.to_string()),
            },
            Self::Aborted { error, elapsed } => {
                let message = error.to_string();
                Settled {
                    status: JobStatus::Failed,
                    result: BatchExecutionResult::aborted(job_id, elapsed, operation_count, message.clone()),
                    error: Some(message),
                }
            }
        }
    }
}

/// A worker's outcome tagged with its completion order.
#[derive(Debug)]
pub struct FinishedJob {
    pub sequence: u64,
    pub outcome: JobOutcome,
}

#[derive(Debug, Default)]
struct Tally {
    processed: usize,
    failed: usize,
    batches: usize,
    rate_limit_hits: u32,
    errors: Vec<String>,
}

impl Tally {
    fn record(&mut self, outcome: BatchOutcome) {
        self.processed += outcome.processed_count;
        self.failed += outcome.failed_count;
        self.batches += 1;
        if let Some(error) = outcome.error {
            self.errors.push(error);
        }
    }

    fn record_error(&mut self, batch_len: usize, error: ExecutorError) {
        self.failed += batch_len;
        self.batches += 1;
        if matches!(error, ExecutorError::RateLimited) {
            self.rate_limit_hits += 1;
        }
        self.errors.push(error.to_string());
    }
}

/// Shared collaborators for job execution.
pub struct JobRunner {
    pub config: CoordinatorConfig,
    pub engine: Arc<AdaptiveBatchingEngine>,
    pub monitor: Arc<ResourceMonitor>,
    pub executor: Arc<dyn WorkExecutor>,
    pub predictor: Option<Arc<dyn PredictionProvider>>,
    pub clock: Arc<dyn Clock>,
    pub dispatcher: JobEventDispatcher,
    finish_sequence: AtomicU64,
}

impl JobRunner {
    pub fn new(
        config: CoordinatorConfig,
        engine: Arc<AdaptiveBatchingEngine>,
        monitor: Arc<ResourceMonitor>,
        executor: Arc<dyn WorkExecutor>,
        predictor: Option<Arc<dyn PredictionProvider>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            engine,
            monitor,
            executor,
            predictor,
            clock,
            dispatcher: JobEventDispatcher::new(),
            finish_sequence: AtomicU64::new(0),
        }
    }

    /// Worker task body.
    pub async fn run_worker(self: Arc<Self>, ticket: JobTicket) -> FinishedJob {
        let outcome = self.run(&ticket).await;
        FinishedJob {
            sequence: self.finish_sequence.fetch_add(1, Ordering::SeqCst),
            outcome,
        }
    }

    /// Execute `ticket` under its timeout.
    pub async fn run(&self, ticket: &JobTicket) -> JobOutcome {
        match tokio::time::timeout(ticket.timeout, self.execute(ticket)).await {
            Ok(outcome) => outcome,
            Err(_) => JobOutcome::Aborted {
                error: CoordinatorError::JobTimedOut {
                    job_id: ticket.job_id.clone(),
                    timeout_secs: ticket.timeout.as_secs(),
                },
                elapsed: ticket.timeout,
            },
        }
    }

    /// Assumed job metrics combined with the monitor's latest cpu and memory.
    pub fn current_metrics(&self) -> PerformanceMetrics {
        let system = self.monitor.current_metrics().system;
        self.config
            .default_metrics
            .with_resources(system.cpu_percent, system.memory_percent, self.clock.now())
    }

    fn active_predictor(&self) -> Option<&Arc<dyn PredictionProvider>> {
        if self.config.auto_optimization_enabled {
            self.predictor.as_ref()
        } else {
            None
        }
    }

    /// Predictor first when enabled, engine otherwise. An open engine
    /// breaker pins the size to the minimum regardless of source.
    pub fn choose_batch_size(&self, features: &PredictionFeatures, priority: Priority) -> (usize, SizeSource) {
        let limits = self.engine.config();
        let op = features.operation_type;
        if self.engine.is_circuit_open(op) {
            return (limits.min_batch_size, SizeSource::Engine);
        }

        if let Some(predictor) = self.active_predictor() {
            let target = OptimizationTarget::for_priority(priority);
            match predictor.predict_batch_size(features, &target) {
                Ok(prediction) => {
                    let size = prediction
                        .batch_size
                        .min(limits.max_batch_size)
                        .max(limits.min_batch_size);
                    return (size, SizeSource::Predictor);
                }
                Err(e) => {
                    tracing::warn!(
                        operation_type = %op,
                        error = %e,
                        "batch size prediction failed, using engine"
                    );
                }
            }
        }

        let size = self
            .engine
            .calculate_optimal_batch_size(op, &features.metrics, features.pending_operations);
        (size, SizeSource::Engine)
    }

    async fn execute(&self, ticket: &JobTicket) -> JobOutcome {
        let started = tokio::time::Instant::now();
        let op = ticket.operation_type;
        let total_ops = ticket.operations.len();

        let metrics = self.current_metrics();
        let features = PredictionFeatures {
            operation_type: op,
            pending_operations: total_ops,
            current_batch_size: self.engine.current_batch_size(op),
            metrics: metrics.clone(),
        };
        let (batch_size, source) = self.choose_batch_size(&features, ticket.priority);
        let ranges = batch_ranges(total_ops, batch_size);
        self.dispatcher.emit_batch_optimized(&BatchOptimizedEvent {
            job_id: ticket.job_id.clone(),
            operation_type: op,
            batch_size,
            batch_count: ranges.len(),
            source,
        });

        let mut tally = Tally::default();
        let mut skipped = 0;
        for range in ranges.iter().cloned() {
            if ticket.cancel.is_cancelled() {
                skipped = total_ops - range.start;
                break;
            }
            let batch = &ticket.operations[range];
            match self.executor.execute_batch(op, batch).await {
                Ok(outcome) => tally.record(outcome),
                Err(e) => {
                    tracing::warn!(job_id = %ticket.job_id, error = %e, "batch failed");
                    tally.record_error(batch.len(), e);
                }
            }
        }

        let cancelled = (skipped > 0).then(|| CoordinatorError::Cancelled {
            job_id: ticket.job_id.clone(),
            skipped,
        });
        let elapsed = started.elapsed();
        let observed = self.observed_metrics(&tally, elapsed, &metrics);
        let result = BatchExecutionResult {
            job_id: ticket.job_id.clone(),
            success: tally.failed == 0 && skipped == 0,
            processed_count: tally.processed,
            failed_count: tally.failed,
            skipped_count: skipped,
            execution_time: elapsed,
            throughput: observed.throughput_ops_per_sec,
            batch_count: tally.batches,
            batch_size,
            error_details: tally.errors.clone(),
            performance_metrics: Some(observed.clone()),
        };

        if tally.batches > 0 {
            self.engine.update_performance_metrics(op, observed);
        }
        if let Some(predictor) = self.active_predictor() {
            predictor.record_outcome(&features, &result);
        }

        match cancelled {
            Some(error) => JobOutcome::Cancelled { result, error },
            None => JobOutcome::Finished(result),
        }
    }

    fn observed_metrics(&self, tally: &Tally, elapsed: Duration, assumed: &PerformanceMetrics) -> PerformanceMetrics {
        let total = tally.processed + tally.failed;
        let secs = elapsed.as_secs_f64();
        let (success_rate, error_rate) = if total > 0 {
            (
                tally.processed as f64 / total as f64,
                tally.failed as f64 / total as f64,
            )
        } else {
            (1.0, 0.0)
        };
        PerformanceMetrics {
            success_rate,
            avg_response_time_ms: if tally.batches > 0 {
                secs * 1000.0 / tally.batches as f64
            } else {
                0.0
            },
            throughput_ops_per_sec: if secs > 0.0 { tally.processed as f64 / secs } else { 0.0 },
            error_rate,
            rate_limit_hits: tally.rate_limit_hits,
            cpu_pct: assumed.cpu_pct,
            memory_pct: assumed.memory_pct,
            network_latency_ms: assumed.network_latency_ms,
            timestamp: self.clock.now(),
        }
    }
}
