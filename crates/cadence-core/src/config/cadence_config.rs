//! Top-level Cadence configuration with layered resolution.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{BatchConfiguration, CoordinatorConfig, MonitorConfig};
use crate::errors::ConfigError;
use crate::tracing_setup::events;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`CADENCE_*`)
/// 2. TOML config file
/// 3. Compiled defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CadenceConfig {
    pub batching: BatchConfiguration,
    pub monitor: MonitorConfig,
    pub coordinator: CoordinatorConfig,
}

impl CadenceConfig {
    /// Load configuration, falling back to defaults on any error.
    ///
    /// A missing, unreadable, or invalid file is logged and replaced by
    /// compiled defaults; environment overrides still apply.
    pub fn load(path: Option<&Path>) -> Self {
        match Self::try_load(path) {
            Ok(config) => config,
            Err(err) => {
                events::emit_config_fallback(path, &err);
                let mut config = Self::default();
                Self::apply_env_overrides(&mut config);
                if config.validate().is_err() {
                    return Self::default();
                }
                config
            }
        }
    }

    /// Load configuration, surfacing the first error.
    pub fn try_load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::read_toml_file(path)?,
            None => Self::default(),
        };
        Self::apply_env_overrides(&mut config);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeFailed {
            message: e.to_string(),
        })
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.batching.validate()?;
        self.monitor.validate()?;
        self.coordinator.validate()?;
        Ok(())
    }

    /// Replace each invalid section with its defaults, logging why.
    pub fn validated_or_default(self) -> Self {
        Self {
            batching: self.batching.validated_or_default(),
            monitor: self.monitor.validated_or_default(),
            coordinator: self.coordinator.validated_or_default(),
        }
    }

    fn read_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Apply environment variable overrides.
    /// Unparseable values are ignored.
    pub fn apply_env_overrides(config: &mut CadenceConfig) {
        if let Some(v) = env_parse("CADENCE_MIN_BATCH_SIZE") {
            config.batching.min_batch_size = v;
        }
        if let Some(v) = env_parse("CADENCE_MAX_BATCH_SIZE") {
            config.batching.max_batch_size = v;
        }
        if let Some(v) = env_parse("CADENCE_TARGET_RESPONSE_TIME_MS") {
            config.batching.target_response_time_ms = v;
        }
        if let Some(v) = env_parse("CADENCE_MAX_ERROR_RATE") {
            config.batching.max_error_rate = v;
        }
        if let Some(v) = env_parse("CADENCE_MONITORING_INTERVAL_SECS") {
            config.monitor.monitoring_interval_secs = v;
        }
        if let Some(v) = env_parse("CADENCE_MAX_CONCURRENT_JOBS") {
            config.coordinator.max_concurrent_jobs = v;
        }
        if let Some(v) = env_parse("CADENCE_JOB_TIMEOUT_SECS") {
            config.coordinator.job_timeout_secs = v;
        }
        if let Some(v) = env_parse("CADENCE_CIRCUIT_BREAKER_THRESHOLD") {
            config.coordinator.circuit_breaker_threshold = v;
        }
        if let Some(v) = env_parse("CADENCE_CIRCUIT_BREAKER_TIMEOUT_SECS") {
            config.coordinator.circuit_breaker_timeout_secs = v;
        }
        if let Some(v) = env_parse::<String>("CADENCE_AUTO_OPTIMIZATION") {
            config.coordinator.auto_optimization_enabled = v == "true" || v == "1";
        }
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
