//! BatchCoordinator: queueing, dispatch, reaping, and the control loop.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use cadence_core::config::CoordinatorConfig;
use cadence_core::constants::HISTORY_CAPACITY;
use cadence_core::errors::CoordinatorError;
use cadence_core::events::{
    panic_message, JobCancelledEvent, JobCompletedEvent, JobEventHandler, JobFailedEvent, JobStartedEvent,
};
use cadence_core::models::{
    AlertLevel, BatchExecutionResult, BatchJob, JobStatus, Operation, OperationType, PerformanceMetrics,
    Priority,
};
use cadence_core::tracing_setup::events;
use cadence_core::traits::{CancelRequest, Clock, PredictionProvider, ResourceSampler, SystemClock, WorkExecutor};
use cadence_core::{BoundedHistory, CadenceConfig};
use cadence_engine::AdaptiveBatchingEngine;
use cadence_monitor::{ResourceMonitor, SysinfoSampler};

use crate::breaker::{BreakerCheck, CircuitBreakerStatus, CoordinatorBreaker};
use crate::dashboard::{CoordinatorOverview, DashboardPerformance, JobStatistics, PerformanceDashboard};
use crate::execution::{FinishedJob, JobOutcome, JobRunner, JobTicket};
use crate::queue::JobQueue;
use crate::status::{CancelOutcome, JobStatusReport, QueueStatus, QueuedJobInfo};

struct CoordinatorState {
    /// Pending and running jobs.
    jobs: HashMap<String, BatchJob>,
    queue: JobQueue,
    running: usize,
    workers: HashMap<String, JoinHandle<FinishedJob>>,
    completed: BoundedHistory<BatchJob>,
    executions: BoundedHistory<BatchExecutionResult>,
    breaker: CoordinatorBreaker,
    job_counter: u64,
}

impl CoordinatorState {
    fn next_id(&mut self, prefix: &str, now: DateTime<Utc>) -> String {
        self.job_counter += 1;
        format!("{prefix}_{}_{}", self.job_counter, now.timestamp())
    }

    fn find_completed(&self, job_id: &str) -> Option<&BatchJob> {
        self.completed.iter().rev().find(|job| job.job_id == job_id)
    }
}

struct LoopTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

struct Inner {
    config: CoordinatorConfig,
    runner: Arc<JobRunner>,
    state: Mutex<CoordinatorState>,
    max_concurrent: Arc<AtomicUsize>,
    dashboard: RwLock<Option<PerformanceDashboard>>,
    loop_task: Mutex<Option<LoopTask>>,
}

enum Notice {
    Completed(JobCompletedEvent),
    Failed(JobFailedEvent),
    Cancelled(JobCancelledEvent),
}

const DEFAULT_CANCEL_REASON: &str = "cancelled by caller";

/// Schedules batch jobs by priority, bounded by a concurrency limit, and
/// pauses dispatch while too many recent jobs have failed.
///
/// Cheap to clone; clones share the same coordinator.
#[derive(Clone)]
pub struct BatchCoordinator {
    inner: Arc<Inner>,
}

/// Assembles a coordinator with optional collaborators.
pub struct CoordinatorBuilder {
    config: CadenceConfig,
    executor: Arc<dyn WorkExecutor>,
    clock: Option<Arc<dyn Clock>>,
    sampler: Option<Arc<dyn ResourceSampler>>,
    predictor: Option<Arc<dyn PredictionProvider>>,
}

impl CoordinatorBuilder {
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn sampler(mut self, sampler: Arc<dyn ResourceSampler>) -> Self {
        self.sampler = Some(sampler);
        self
    }

    pub fn predictor(mut self, predictor: Arc<dyn PredictionProvider>) -> Self {
        self.predictor = Some(predictor);
        self
    }

    /// Invalid configuration sections fall back to their defaults.
    pub fn build(self) -> BatchCoordinator {
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let sampler: Arc<dyn ResourceSampler> = match self.sampler {
            Some(sampler) => sampler,
            None => Arc::new(SysinfoSampler::new()),
        };
        let CadenceConfig {
            batching,
            monitor,
            coordinator,
        } = self.config.validated_or_default();

        let engine = Arc::new(AdaptiveBatchingEngine::with_clock(batching, Arc::clone(&clock)));
        let monitor = Arc::new(ResourceMonitor::with_parts(monitor, sampler, Arc::clone(&clock)));
        let max_concurrent = Arc::new(AtomicUsize::new(coordinator.max_concurrent_jobs.max(1)));
        wire_monitor(&monitor, &engine, &max_concurrent);

        let state = CoordinatorState {
            jobs: HashMap::new(),
            queue: JobQueue::new(),
            running: 0,
            workers: HashMap::new(),
            completed: BoundedHistory::new(HISTORY_CAPACITY),
            executions: BoundedHistory::new(HISTORY_CAPACITY),
            breaker: CoordinatorBreaker::new(
                coordinator.circuit_breaker_threshold,
                coordinator.circuit_breaker_timeout(),
            ),
            job_counter: 0,
        };
        let runner = JobRunner::new(
            coordinator.clone(),
            engine,
            monitor,
            self.executor,
            self.predictor,
            clock,
        );

        BatchCoordinator {
            inner: Arc::new(Inner {
                config: coordinator,
                runner: Arc::new(runner),
                state: Mutex::new(state),
                max_concurrent,
                dashboard: RwLock::new(None),
                loop_task: Mutex::new(None),
            }),
        }
    }
}

/// Feed resource samples into the engine for every operation type and
/// halve the concurrency limit on critical alerts.
fn wire_monitor(monitor: &ResourceMonitor, engine: &Arc<AdaptiveBatchingEngine>, max_concurrent: &Arc<AtomicUsize>) {
    let engine = Arc::clone(engine);
    monitor.register_callback(move |sample| {
        for op in OperationType::ALL {
            engine.update_performance_metrics(
                op,
                PerformanceMetrics::resource_only(sample.cpu_percent, sample.memory_percent, sample.timestamp),
            );
        }
    });

    let max_concurrent = Arc::clone(max_concurrent);
    monitor.register_alert_callback(move |alert| {
        if !matches!(alert.level, AlertLevel::Critical) {
            return;
        }
        let halve = |n: usize| Some((n / 2).max(1));
        if let Ok(previous) = max_concurrent.fetch_update(Ordering::SeqCst, Ordering::SeqCst, halve) {
            let reduced = (previous / 2).max(1);
            if reduced != previous {
                events::emit_concurrency_reduced(previous, reduced);
            }
        }
    });
}

impl BatchCoordinator {
    pub fn builder(config: CadenceConfig, executor: Arc<dyn WorkExecutor>) -> CoordinatorBuilder {
        CoordinatorBuilder {
            config,
            executor,
            clock: None,
            sampler: None,
            predictor: None,
        }
    }

    /// Coordinator with the OS sampler, the system clock, and no predictor.
    pub fn new(config: CadenceConfig, executor: Arc<dyn WorkExecutor>) -> Self {
        Self::builder(config, executor).build()
    }

    /// Load configuration from `path` (defaults on any error) and build.
    pub fn from_config_file(path: Option<&Path>, executor: Arc<dyn WorkExecutor>) -> Self {
        Self::new(CadenceConfig::load(path), executor)
    }

    pub fn engine(&self) -> &Arc<AdaptiveBatchingEngine> {
        &self.inner.runner.engine
    }

    pub fn monitor(&self) -> &Arc<ResourceMonitor> {
        &self.inner.runner.monitor
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    pub fn register_handler(&self, handler: Arc<dyn JobEventHandler>) {
        self.inner.runner.dispatcher.register(handler);
    }

    fn now(&self) -> DateTime<Utc> {
        self.inner.runner.clock.now()
    }

    /// Queue a job. Nothing runs until a tick dispatches it.
    pub fn submit_job(
        &self,
        operations: Vec<Operation>,
        operation_type: OperationType,
        priority: Priority,
        job_id: Option<String>,
    ) -> Result<String, CoordinatorError> {
        let now = self.now();
        let mut state = self.inner.state.lock();
        let job_id = match job_id {
            Some(id) => id,
            None => state.next_id("batch_job", now),
        };
        if state.jobs.contains_key(&job_id) || state.find_completed(&job_id).is_some() {
            return Err(CoordinatorError::DuplicateJobId { job_id });
        }

        let job = BatchJob::new(
            job_id.clone(),
            operation_type,
            operations,
            priority,
            self.inner.config.max_retry_attempts,
            self.inner.config.job_timeout(),
            now,
        );
        let operation_count = job.operation_count();
        state.queue.push(job_id.clone(), priority, now);
        state.jobs.insert(job_id.clone(), job);
        drop(state);

        tracing::info!(
            job_id = %job_id,
            operation_type = %operation_type,
            priority = %priority,
            operations = operation_count,
            "job submitted"
        );
        Ok(job_id)
    }

    /// Cancel a pending job outright, or ask a running one to stop after
    /// its in-flight batch.
    pub fn cancel_job(&self, job_id: &str) -> Result<CancelOutcome, CoordinatorError> {
        self.cancel_job_with_reason(job_id, DEFAULT_CANCEL_REASON)
    }

    /// Like [`cancel_job`](Self::cancel_job), recording `reason` on the job.
    /// A running job keeps the first reason it was given.
    pub fn cancel_job_with_reason(&self, job_id: &str, reason: &str) -> Result<CancelOutcome, CoordinatorError> {
        let now = self.now();
        let mut state = self.inner.state.lock();

        if state.queue.remove(job_id) {
            let mut event = None;
            if let Some(mut job) = state.jobs.remove(job_id) {
                job.cancel.cancel(reason, now);
                job.status = JobStatus::Cancelled;
                job.completed_at = Some(now);
                job.error = Some(reason.to_string());
                event = Some(JobCancelledEvent {
                    job_id: job.job_id.clone(),
                    operation_type: job.operation_type,
                    request: CancelRequest {
                        requested_at: now,
                        reason: reason.to_string(),
                    },
                    result: None,
                });
                state.completed.push(job);
            }
            drop(state);
            tracing::info!(job_id, reason, "cancelled queued job");
            if let Some(event) = event {
                self.inner.runner.dispatcher.emit_job_cancelled(&event);
            }
            return Ok(CancelOutcome::Cancelled);
        }

        if let Some(job) = state.jobs.get(job_id) {
            let first = job.cancel.cancel(reason, now);
            drop(state);
            if first {
                tracing::info!(job_id, reason, "cancellation requested for running job");
            }
            return Ok(CancelOutcome::CancellationRequested);
        }

        match state.find_completed(job_id) {
            Some(job) => Err(CoordinatorError::AlreadyTerminal {
                job_id: job_id.to_string(),
                status: job.status,
            }),
            None => Err(CoordinatorError::JobNotFound {
                job_id: job_id.to_string(),
            }),
        }
    }

    /// One control-loop step: breaker check, dispatch of at most one job,
    /// reaping of finished workers, and a dashboard refresh when due.
    pub async fn tick(&self) {
        let now = self.now();
        if self.check_circuit_breaker(now).allows_dispatch() {
            self.dispatch_next(now);
        }
        self.reap(false).await;
        self.refresh_dashboard_if_due(now);
    }

    fn check_circuit_breaker(&self, now: DateTime<Utc>) -> BreakerCheck {
        let check = {
            let mut state = self.inner.state.lock();
            let CoordinatorState {
                breaker, completed, ..
            } = &mut *state;
            breaker.evaluate(now, completed)
        };
        match check {
            BreakerCheck::JustOpened { failures } => {
                events::emit_coordinator_breaker_opened(failures, self.inner.config.circuit_breaker_timeout_secs);
            }
            BreakerCheck::JustClosed => events::emit_coordinator_breaker_closed(),
            BreakerCheck::Open | BreakerCheck::Closed => {}
        }
        check
    }

    /// Start the highest-priority pending job if under the concurrency limit.
    fn dispatch_next(&self, now: DateTime<Utc>) -> Option<String> {
        let (ticket, event) = {
            let mut state = self.inner.state.lock();
            if state.running >= self.max_concurrent_jobs() {
                return None;
            }
            let job_id = state.queue.pop()?;
            let job = state.jobs.get_mut(&job_id)?;
            job.status = JobStatus::Running;
            job.started_at = Some(now);
            let ticket = JobTicket::from(&*job);
            let event = JobStartedEvent {
                job_id: job.job_id.clone(),
                operation_type: job.operation_type,
                priority: job.priority,
                operation_count: job.operation_count(),
                started_at: now,
            };
            state.running += 1;
            (ticket, event)
        };

        events::emit_job_started(&event.job_id, event.operation_type, event.operation_count);
        self.inner.runner.dispatcher.emit_job_started(&event);

        let runner = Arc::clone(&self.inner.runner);
        let handle = tokio::spawn(runner.run_worker(ticket));
        self.inner.state.lock().workers.insert(event.job_id.clone(), handle);
        Some(event.job_id)
    }

    /// Collect finished workers (or all of them when `wait_all`), settle
    /// their jobs, and fire callbacks in completion order.
    async fn reap(&self, wait_all: bool) {
        let handles: Vec<(String, JoinHandle<FinishedJob>)> = {
            let mut state = self.inner.state.lock();
            let ids: Vec<String> = state
                .workers
                .iter()
                .filter(|(_, handle)| wait_all || handle.is_finished())
                .map(|(id, _)| id.clone())
                .collect();
            ids.into_iter()
                .filter_map(|id| state.workers.remove(&id).map(|handle| (id, handle)))
                .collect()
        };
        if handles.is_empty() {
            return;
        }

        let mut finished = Vec::with_capacity(handles.len());
        for (job_id, handle) in handles {
            match handle.await {
                Ok(done) => finished.push((done.sequence, job_id, done.outcome)),
                Err(e) => {
                    let message = if e.is_panic() {
                        panic_message(&*e.into_panic())
                    } else {
                        e.to_string()
                    };
                    let outcome = JobOutcome::Aborted {
                        error: CoordinatorError::WorkerPanicked {
                            job_id: job_id.clone(),
                            message,
                        },
                        elapsed: Duration::ZERO,
                    };
                    finished.push((u64::MAX, job_id, outcome));
                }
            }
        }
        finished.sort_by_key(|(sequence, _, _)| *sequence);

        let now = self.now();
        let notices: Vec<Notice> = {
            let mut state = self.inner.state.lock();
            finished
                .into_iter()
                .filter_map(|(_, job_id, outcome)| settle_job(&mut state, &job_id, outcome, now))
                .collect()
        };

        for notice in &notices {
            match notice {
                Notice::Completed(event) => {
                    log_finished(&event.result);
                    self.inner.runner.dispatcher.emit_job_completed(event);
                }
                Notice::Failed(event) => {
                    if let Some(result) = &event.result {
                        log_finished(result);
                    }
                    self.inner.runner.dispatcher.emit_job_failed(event);
                }
                Notice::Cancelled(event) => {
                    if let Some(result) = &event.result {
                        log_finished(result);
                    }
                    self.inner.runner.dispatcher.emit_job_cancelled(event);
                }
            }
        }
    }

    fn refresh_dashboard_if_due(&self, now: DateTime<Utc>) {
        if !self.inner.config.performance_tracking_enabled {
            return;
        }
        let last = self.inner.dashboard.read().as_ref().map(|d| d.timestamp);
        let due = match last {
            None => true,
            Some(last) => (now - last)
                .to_std()
                .map_or(false, |elapsed| elapsed >= self.inner.config.dashboard_update_interval()),
        };
        if due {
            self.refresh_dashboard();
        }
    }

    /// Rebuild the dashboard now and return it.
    pub fn refresh_dashboard(&self) -> PerformanceDashboard {
        let system = self.monitor().current_metrics().system;
        let batching = self.engine().performance_summary();
        let running = self.is_running();
        let max_concurrent_jobs = self.max_concurrent_jobs();
        let dashboard = {
            let state = self.inner.state.lock();
            PerformanceDashboard {
                timestamp: self.now(),
                coordinator: CoordinatorOverview {
                    running,
                    active_jobs: state.running,
                    queued_jobs: state.queue.len(),
                    max_concurrent_jobs,
                    circuit_breaker_active: state.breaker.is_active(),
                },
                jobs: JobStatistics::from_completed(&state.completed),
                performance: DashboardPerformance::from_history(
                    &state.executions,
                    system.cpu_percent,
                    system.memory_percent,
                ),
                batching,
            }
        };
        *self.inner.dashboard.write() = Some(dashboard.clone());
        dashboard
    }

    /// Last dashboard built by the control loop, if any.
    pub fn performance_dashboard(&self) -> Option<PerformanceDashboard> {
        self.inner.dashboard.read().clone()
    }

    pub fn job_status(&self, job_id: &str) -> Option<JobStatusReport> {
        let state = self.inner.state.lock();
        state
            .jobs
            .get(job_id)
            .or_else(|| state.find_completed(job_id))
            .map(JobStatusReport::from)
    }

    pub fn queue_status(&self) -> QueueStatus {
        let now = self.now();
        let state = self.inner.state.lock();
        let queue_details = state
            .queue
            .ordered_ids()
            .iter()
            .filter_map(|id| state.jobs.get(id))
            .map(|job| QueuedJobInfo {
                job_id: job.job_id.clone(),
                operation_type: job.operation_type,
                priority: job.priority,
                operation_count: job.operation_count(),
                created_at: job.created_at,
                wait_time: (now - job.created_at).to_std().unwrap_or_default(),
            })
            .collect();
        QueueStatus {
            queued_jobs: state.queue.len(),
            active_jobs: state.running,
            completed_jobs: state.completed.len(),
            max_concurrent_jobs: self.max_concurrent_jobs(),
            queue_details,
        }
    }

    pub fn circuit_breaker_status(&self) -> CircuitBreakerStatus {
        let state = self.inner.state.lock();
        state.breaker.status(&state.completed)
    }

    pub fn max_concurrent_jobs(&self) -> usize {
        self.inner.max_concurrent.load(Ordering::SeqCst)
    }

    pub fn active_job_count(&self) -> usize {
        self.inner.state.lock().running
    }

    /// Recent execution results, oldest first.
    pub fn execution_history(&self, n: usize) -> Vec<BatchExecutionResult> {
        self.inner.state.lock().executions.recent_vec(n)
    }

    /// Run `operations` now, bypassing the queue, the concurrency limit,
    /// and job callbacks.
    pub async fn execute_immediate_batch(
        &self,
        operations: Vec<Operation>,
        operation_type: OperationType,
    ) -> BatchExecutionResult {
        let now = self.now();
        let job_id = self.inner.state.lock().next_id("immediate", now);
        let job = BatchJob::new(
            job_id.clone(),
            operation_type,
            operations,
            Priority::High,
            self.inner.config.max_retry_attempts,
            self.inner.config.job_timeout(),
            now,
        );
        let ticket = JobTicket::from(&job);
        let outcome = self.inner.runner.run(&ticket).await;
        let settled = outcome.settle(&job_id, job.operation_count());
        log_finished(&settled.result);
        settled.result
    }

    pub fn is_running(&self) -> bool {
        self.inner.loop_task.lock().is_some()
    }

    /// Start resource monitoring and the control loop on the current tokio
    /// runtime. No-op if already running.
    pub fn start(&self) {
        let mut task = self.inner.loop_task.lock();
        if task.is_some() {
            tracing::warn!("batch coordinator already running");
            return;
        }
        self.monitor().start();

        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let coordinator = self.clone();
        let interval = self.inner.config.tick_interval();
        let handle = tokio::spawn(async move {
            loop {
                coordinator.tick().await;
                tokio::select! {
                    _ = shutdown_rx.changed() => break,
                    _ = tokio::time::sleep(interval) => {}
                }
            }
        });
        *task = Some(LoopTask { shutdown, handle });
        tracing::info!(
            tick_ms = interval.as_millis() as u64,
            max_concurrent_jobs = self.max_concurrent_jobs(),
            "batch coordinator started"
        );
    }

    /// Stop the control loop and monitoring, then wait for running jobs to
    /// finish. Pending jobs stay queued.
    pub async fn stop(&self) {
        let task = self.inner.loop_task.lock().take();
        if let Some(task) = task {
            let _ = task.shutdown.send(true);
            if let Err(e) = task.handle.await {
                tracing::warn!(error = %e, "coordinator loop ended abnormally");
            }
        }
        self.monitor().stop().await;
        self.reap(true).await;
        tracing::info!("batch coordinator stopped");
    }
}

fn settle_job(
    state: &mut CoordinatorState,
    job_id: &str,
    outcome: JobOutcome,
    now: DateTime<Utc>,
) -> Option<Notice> {
    let mut job = state.jobs.remove(job_id)?;
    state.running = state.running.saturating_sub(1);

    let settled = outcome.settle(job_id, job.operation_count());
    job.status = settled.status;
    job.completed_at = Some(now);
    job.result = Some(settled.result.clone());
    job.error = settled.error.clone();
    state.executions.push(settled.result.clone());

    let notice = match (settled.status, settled.error, job.cancel.request().cloned()) {
        (JobStatus::Cancelled, _, Some(request)) => Notice::Cancelled(JobCancelledEvent {
            job_id: job.job_id.clone(),
            operation_type: job.operation_type,
            request,
            result: Some(settled.result),
        }),
        (_, None, _) => Notice::Completed(JobCompletedEvent {
            job_id: job.job_id.clone(),
            operation_type: job.operation_type,
            result: settled.result,
        }),
        (_, Some(error), _) => Notice::Failed(JobFailedEvent {
            job_id: job.job_id.clone(),
            operation_type: job.operation_type,
            error,
            result: Some(settled.result),
        }),
    };
    state.completed.push(job);
    Some(notice)
}

fn log_finished(result: &BatchExecutionResult) {
    events::emit_job_finished(
        &result.job_id,
        result.success,
        result.processed_count,
        result.failed_count,
        result.execution_time.as_millis(),
    );
}
