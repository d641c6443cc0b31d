//! # cadence-coordinator
//!
//! Schedules batch jobs on top of the adaptive batching engine: a priority
//! queue with bounded concurrency, one worker task per running job, a
//! job-level circuit breaker, lifecycle callbacks, and a periodic
//! performance dashboard.

pub mod breaker;
pub mod coordinator;
pub mod dashboard;
pub mod execution;
pub mod queue;
pub mod status;

pub use breaker::CircuitBreakerStatus;
pub use coordinator::{BatchCoordinator, CoordinatorBuilder};
pub use dashboard::PerformanceDashboard;
pub use status::{CancelOutcome, JobStatusReport, QueueStatus, QueuedJobInfo};
