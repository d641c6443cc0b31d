use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::batching_config::invalid;
use super::defaults;
use crate::errors::ConfigError;
use crate::models::PerformanceMetrics;

/// Metrics assumed for a job when only host resources are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultJobMetrics {
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
    pub throughput_ops_per_sec: f64,
    pub error_rate: f64,
    pub rate_limit_hits: u32,
    pub network_latency_ms: f64,
}

impl Default for DefaultJobMetrics {
    fn default() -> Self {
        Self {
            success_rate: defaults::DEFAULT_JOB_SUCCESS_RATE,
            avg_response_time_ms: defaults::DEFAULT_JOB_RESPONSE_TIME_MS,
            throughput_ops_per_sec: defaults::DEFAULT_JOB_THROUGHPUT,
            error_rate: defaults::DEFAULT_JOB_ERROR_RATE,
            rate_limit_hits: 0,
            network_latency_ms: defaults::DEFAULT_JOB_NETWORK_LATENCY_MS,
        }
    }
}

impl DefaultJobMetrics {
    /// Combine the assumed values with observed host usage.
    pub fn with_resources(&self, cpu_pct: f64, memory_pct: f64, timestamp: DateTime<Utc>) -> PerformanceMetrics {
        PerformanceMetrics {
            success_rate: self.success_rate,
            avg_response_time_ms: self.avg_response_time_ms,
            throughput_ops_per_sec: self.throughput_ops_per_sec,
            error_rate: self.error_rate,
            rate_limit_hits: self.rate_limit_hits,
            cpu_pct,
            memory_pct,
            network_latency_ms: self.network_latency_ms,
            timestamp,
        }
    }
}

/// Job scheduling and circuit breaker configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorConfig {
    pub max_concurrent_jobs: usize,
    pub job_timeout_secs: u64,
    pub max_retry_attempts: u32,
    pub circuit_breaker_threshold: usize,
    pub circuit_breaker_timeout_secs: u64,
    pub dashboard_update_interval_secs: u64,
    pub tick_interval_ms: u64,
    pub performance_tracking_enabled: bool,
    pub auto_optimization_enabled: bool,
    pub default_metrics: DefaultJobMetrics,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: defaults::DEFAULT_MAX_CONCURRENT_JOBS,
            job_timeout_secs: defaults::DEFAULT_JOB_TIMEOUT_SECS,
            max_retry_attempts: defaults::DEFAULT_MAX_RETRY_ATTEMPTS,
            circuit_breaker_threshold: defaults::DEFAULT_CIRCUIT_BREAKER_THRESHOLD,
            circuit_breaker_timeout_secs: defaults::DEFAULT_CIRCUIT_BREAKER_TIMEOUT_SECS,
            dashboard_update_interval_secs: defaults::DEFAULT_DASHBOARD_UPDATE_INTERVAL_SECS,
            tick_interval_ms: defaults::DEFAULT_TICK_INTERVAL_MS,
            performance_tracking_enabled: defaults::DEFAULT_PERFORMANCE_TRACKING_ENABLED,
            auto_optimization_enabled: defaults::DEFAULT_AUTO_OPTIMIZATION_ENABLED,
            default_metrics: DefaultJobMetrics::default(),
        }
    }
}

impl CoordinatorConfig {
    pub fn job_timeout(&self) -> Duration {
        Duration::from_secs(self.job_timeout_secs)
    }

    pub fn circuit_breaker_timeout(&self) -> Duration {
        Duration::from_secs(self.circuit_breaker_timeout_secs)
    }

    pub fn dashboard_update_interval(&self) -> Duration {
        Duration::from_secs(self.dashboard_update_interval_secs)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// This configuration if valid, otherwise defaults.
    pub fn validated_or_default(self) -> Self {
        super::or_defaults(self, Self::validate)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrent_jobs == 0 {
            return Err(invalid("coordinator.max_concurrent_jobs", "must be at least 1"));
        }
        if self.job_timeout_secs == 0 {
            return Err(invalid("coordinator.job_timeout_secs", "must be greater than 0"));
        }
        if self.circuit_breaker_threshold == 0 {
            return Err(invalid("coordinator.circuit_breaker_threshold", "must be at least 1"));
        }
        if self.tick_interval_ms == 0 {
            return Err(invalid("coordinator.tick_interval_ms", "must be greater than 0"));
        }
        Ok(())
    }
}
