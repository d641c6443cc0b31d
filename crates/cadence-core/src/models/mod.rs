//! Data model shared by the monitor, engine, and coordinator.

pub mod job;
pub mod metrics;
pub mod operation;
pub mod prediction;
pub mod priority;
pub mod resources;
pub mod strategy;

pub use job::{BatchExecutionResult, BatchJob, BatchOutcome, JobStatus};
pub use metrics::PerformanceMetrics;
pub use operation::{Operation, OperationType};
pub use prediction::{BatchPrediction, OptimizationGoal, OptimizationTarget, PredictionFeatures};
pub use priority::Priority;
pub use resources::{AlertLevel, ResourceAlert, ResourceKind, SystemResources, Trend};
pub use strategy::BatchStrategy;
