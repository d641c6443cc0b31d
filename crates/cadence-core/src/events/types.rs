//! Job lifecycle event payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{BatchExecutionResult, OperationType, Priority};
use crate::traits::CancelRequest;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobStartedEvent {
    pub job_id: String,
    pub operation_type: OperationType,
    pub priority: Priority,
    pub operation_count: usize,
    pub started_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCompletedEvent {
    pub job_id: String,
    pub operation_type: OperationType,
    pub result: BatchExecutionResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobFailedEvent {
    pub job_id: String,
    pub operation_type: OperationType,
    pub error: String,
    /// Present when at least the aggregation step ran.
    pub result: Option<BatchExecutionResult>,
}

/// A job stopped by request. `result` is absent when it never started.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobCancelledEvent {
    pub job_id: String,
    pub operation_type: OperationType,
    pub request: CancelRequest,
    pub result: Option<BatchExecutionResult>,
}

/// Where a job's batch size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeSource {
    Predictor,
    Engine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchOptimizedEvent {
    pub job_id: String,
    pub operation_type: OperationType,
    pub batch_size: usize,
    pub batch_count: usize,
    pub source: SizeSource,
}
