//! Aggregate error for callers that span subsystems.

use super::{ConfigError, CoordinatorError, ExecutorError, MonitorError, PredictionError};

/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum CadenceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Monitor error: {0}")]
    Monitor(#[from] MonitorError),

    #[error("Executor error: {0}")]
    Executor(#[from] ExecutorError),

    #[error("Prediction error: {0}")]
    Prediction(#[from] PredictionError),

    #[error("Coordinator error: {0}")]
    Coordinator(#[from] CoordinatorError),
}

pub type CadenceResult<T> = Result<T, CadenceError>;
