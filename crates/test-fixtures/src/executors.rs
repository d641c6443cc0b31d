use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use cadence_core::errors::ExecutorError;
use cadence_core::models::{BatchOutcome, Operation, OperationType};
use cadence_core::traits::WorkExecutor;

/// Records every call and tracks how many batches run at once.
///
/// While `fail` is set every batch returns an error.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    delay: Option<Duration>,
    fail: AtomicBool,
    calls: Mutex<Vec<(OperationType, usize)>>,
    ids: Mutex<Vec<Operation>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        let executor = Self::default();
        executor.set_failing(true);
        executor
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Batch sizes in call order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls.lock().iter().map(|(_, n)| *n).collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Every operation seen, in execution order.
    pub fn seen(&self) -> Vec<Operation> {
        self.ids.lock().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkExecutor for RecordingExecutor {
    async fn execute_batch(
        &self,
        operation_type: OperationType,
        batch: &[Operation],
    ) -> Result<BatchOutcome, ExecutorError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().push((operation_type, batch.len()));
        self.ids.lock().extend(batch.iter().cloned());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) {
            return Err(ExecutorError::Rejected {
                reason: "scripted failure".to_string(),
            });
        }
        Ok(BatchOutcome::success(batch.len(), self.delay.unwrap_or(Duration::from_millis(1))))
    }
}
