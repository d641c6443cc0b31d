//! Downstream work executor.

use async_trait::async_trait;

use crate::errors::ExecutorError;
use crate::models::{BatchOutcome, Operation, OperationType};

/// Executes one batch against the downstream service.
///
/// An `Err` marks the whole batch as failed; partial failures are
/// reported through `BatchOutcome::failed_count`.
#[async_trait]
pub trait WorkExecutor: Send + Sync {
    async fn execute_batch(
        &self,
        operation_type: OperationType,
        batch: &[Operation],
    ) -> Result<BatchOutcome, ExecutorError>;
}
