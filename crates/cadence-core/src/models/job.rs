use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Operation, OperationType, PerformanceMetrics, Priority};
use crate::traits::CancellationToken;

/// Lifecycle status of a job. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A submitted unit of batched work, owned by the coordinator.
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub job_id: String,
    pub operation_type: OperationType,
    pub operations: Arc<[Operation]>,
    pub priority: Priority,
    /// Recorded for callers; the coordinator does not retry.
    pub max_retry_attempts: u32,
    pub timeout: Duration,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub status: JobStatus,
    pub result: Option<BatchExecutionResult>,
    pub error: Option<String>,
    pub cancel: CancellationToken,
}

impl BatchJob {
    pub fn new(
        job_id: impl Into<String>,
        operation_type: OperationType,
        operations: Vec<Operation>,
        priority: Priority,
        max_retry_attempts: u32,
        timeout: Duration,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            operation_type,
            operations: operations.into(),
            priority,
            max_retry_attempts,
            timeout,
            created_at,
            started_at: None,
            completed_at: None,
            status: JobStatus::Pending,
            result: None,
            error: None,
            cancel: CancellationToken::new(),
        }
    }

    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }
}

/// Outcome of a single executor call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOutcome {
    pub processed_count: usize,
    pub failed_count: usize,
    pub duration: Duration,
    pub error: Option<String>,
}

impl BatchOutcome {
    pub fn success(processed_count: usize, duration: Duration) -> Self {
        Self {
            processed_count,
            failed_count: 0,
            duration,
            error: None,
        }
    }

    /// Whole-batch failure.
    pub fn failed(batch_len: usize, duration: Duration, error: impl Into<String>) -> Self {
        Self {
            processed_count: 0,
            failed_count: batch_len,
            duration,
            error: Some(error.into()),
        }
    }
}

/// Aggregated result of running one job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchExecutionResult {
    pub job_id: String,
    pub success: bool,
    pub processed_count: usize,
    pub failed_count: usize,
    /// Operations never attempted because the job was cancelled.
    #[serde(default)]
    pub skipped_count: usize,
    pub execution_time: Duration,
    /// Processed operations per second over the whole job.
    pub throughput: f64,
    pub batch_count: usize,
    pub batch_size: usize,
    pub error_details: Vec<String>,
    pub performance_metrics: Option<PerformanceMetrics>,
}

impl BatchExecutionResult {
    /// Result for a job that failed before any batch ran.
    pub fn aborted(job_id: impl Into<String>, execution_time: Duration, failed_count: usize, error: String) -> Self {
        Self {
            job_id: job_id.into(),
            success: false,
            processed_count: 0,
            failed_count,
            skipped_count: 0,
            execution_time,
            throughput: 0.0,
            batch_count: 0,
            batch_size: 0,
            error_details: vec![error],
            performance_metrics: None,
        }
    }
}
