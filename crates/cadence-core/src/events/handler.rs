//! JobEventHandler trait with no-op defaults.

use super::types::*;

/// Subscriber for job lifecycle events.
///
/// All methods default to no-ops; implement only what you need.
/// Handlers run synchronously on the coordinator's task and must not block.
pub trait JobEventHandler: Send + Sync {
    fn on_job_started(&self, _event: &JobStartedEvent) {}

    fn on_job_completed(&self, _event: &JobCompletedEvent) {}

    fn on_job_failed(&self, _event: &JobFailedEvent) {}

    fn on_job_cancelled(&self, _event: &JobCancelledEvent) {}

    fn on_batch_optimized(&self, _event: &BatchOptimizedEvent) {}
}
