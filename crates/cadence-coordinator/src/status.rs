//! Read-only views over coordinator state.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::models::{BatchExecutionResult, BatchJob, JobStatus, OperationType, Priority};
use cadence_core::traits::CancelRequest;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatusReport {
    pub job_id: String,
    pub status: JobStatus,
    pub operation_type: OperationType,
    pub operation_count: usize,
    pub priority: Priority,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Wall time between start and completion, once both are known.
    pub execution_time: Option<Duration>,
    pub result: Option<BatchExecutionResult>,
    pub error: Option<String>,
    /// Set once cancellation was requested, including while still running.
    pub cancel_request: Option<CancelRequest>,
}

impl From<&BatchJob> for JobStatusReport {
    fn from(job: &BatchJob) -> Self {
        let execution_time = match (job.started_at, job.completed_at) {
            (Some(start), Some(end)) => (end - start).to_std().ok(),
            _ => None,
        };
        Self {
            job_id: job.job_id.clone(),
            status: job.status,
            operation_type: job.operation_type,
            operation_count: job.operation_count(),
            priority: job.priority,
            created_at: job.created_at,
            started_at: job.started_at,
            completed_at: job.completed_at,
            execution_time,
            result: job.result.clone(),
            error: job.error.clone(),
            cancel_request: job.cancel.request().cloned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuedJobInfo {
    pub job_id: String,
    pub operation_type: OperationType,
    pub priority: Priority,
    pub operation_count: usize,
    pub created_at: DateTime<Utc>,
    pub wait_time: Duration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueStatus {
    pub queued_jobs: usize,
    pub active_jobs: usize,
    pub completed_jobs: usize,
    pub max_concurrent_jobs: usize,
    /// Queued jobs in dispatch order.
    pub queue_details: Vec<QueuedJobInfo>,
}

/// What `cancel_job` did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelOutcome {
    /// The job was pending and is now cancelled.
    Cancelled,
    /// The job is running; its remaining batches will be skipped.
    CancellationRequested,
}
