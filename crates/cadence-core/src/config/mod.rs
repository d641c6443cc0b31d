//! Configuration for all subsystems.

pub mod batching_config;
pub mod cadence_config;
pub mod coordinator_config;
pub mod defaults;
pub mod monitor_config;

pub use batching_config::BatchConfiguration;
pub use cadence_config::CadenceConfig;
pub use coordinator_config::{CoordinatorConfig, DefaultJobMetrics};
pub use monitor_config::{MonitorConfig, ResourceThresholds, ThresholdPair};

use crate::errors::ConfigError;
use crate::tracing_setup::events;

/// `config` if it passes `check`, otherwise defaults with a logged warning.
pub(crate) fn or_defaults<T: Default>(config: T, check: fn(&T) -> Result<(), ConfigError>) -> T {
    match check(&config) {
        Ok(()) => config,
        Err(err) => {
            events::emit_config_fallback(None, &err);
            T::default()
        }
    }
}
