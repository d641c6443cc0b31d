//! Error handling for Cadence.
//! One error enum per subsystem, `thiserror` only.

pub mod cadence_error;
pub mod config_error;
pub mod coordinator_error;
pub mod executor_error;
pub mod monitor_error;
pub mod prediction_error;

pub use cadence_error::{CadenceError, CadenceResult};
pub use config_error::ConfigError;
pub use coordinator_error::CoordinatorError;
pub use executor_error::ExecutorError;
pub use monitor_error::MonitorError;
pub use prediction_error::PredictionError;
