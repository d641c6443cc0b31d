use serde::{Deserialize, Serialize};

use super::defaults;
use crate::errors::ConfigError;

/// Batch sizing bounds and the targets the engine adapts toward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfiguration {
    pub min_batch_size: usize,
    pub max_batch_size: usize,
    pub target_response_time_ms: f64,
    pub max_error_rate: f64,
    pub rate_limit_threshold: u32,
    pub cpu_threshold_pct: f64,
    pub memory_threshold_pct: f64,
    /// Carried for compatibility; sizing deltas are fixed per strategy.
    pub adaptation_sensitivity: f64,
}

impl Default for BatchConfiguration {
    fn default() -> Self {
        Self {
            min_batch_size: defaults::DEFAULT_MIN_BATCH_SIZE,
            max_batch_size: defaults::DEFAULT_MAX_BATCH_SIZE,
            target_response_time_ms: defaults::DEFAULT_TARGET_RESPONSE_TIME_MS,
            max_error_rate: defaults::DEFAULT_MAX_ERROR_RATE,
            rate_limit_threshold: defaults::DEFAULT_RATE_LIMIT_THRESHOLD,
            cpu_threshold_pct: defaults::DEFAULT_CPU_THRESHOLD_PCT,
            memory_threshold_pct: defaults::DEFAULT_MEMORY_THRESHOLD_PCT,
            adaptation_sensitivity: defaults::DEFAULT_ADAPTATION_SENSITIVITY,
        }
    }
}

impl BatchConfiguration {
    /// Clamp `size` into `[min_batch_size, max_batch_size]`.
    pub fn clamp(&self, size: usize) -> usize {
        size.clamp(self.min_batch_size, self.max_batch_size)
    }

    /// This configuration if valid, otherwise defaults.
    pub fn validated_or_default(self) -> Self {
        super::or_defaults(self, Self::validate)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_batch_size == 0 {
            return Err(invalid("batching.min_batch_size", "must be at least 1"));
        }
        if self.min_batch_size > self.max_batch_size {
            return Err(invalid(
                "batching.max_batch_size",
                "must be greater than or equal to min_batch_size",
            ));
        }
        if self.target_response_time_ms <= 0.0 {
            return Err(invalid("batching.target_response_time_ms", "must be positive"));
        }
        if !(0.0..=1.0).contains(&self.max_error_rate) {
            return Err(invalid("batching.max_error_rate", "must be between 0.0 and 1.0"));
        }
        for (field, pct) in [
            ("batching.cpu_threshold_pct", self.cpu_threshold_pct),
            ("batching.memory_threshold_pct", self.memory_threshold_pct),
        ] {
            if !(0.0..=100.0).contains(&pct) {
                return Err(invalid(field, "must be between 0 and 100"));
            }
        }
        Ok(())
    }
}

pub(crate) fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::ValidationFailed {
        field: field.to_string(),
        message: message.to_string(),
    }
}
