use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time performance observation for one operation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    /// Fraction of operations that succeeded, in [0, 1].
    pub success_rate: f64,
    pub avg_response_time_ms: f64,
    pub throughput_ops_per_sec: f64,
    /// Fraction of operations that failed, in [0, 1].
    pub error_rate: f64,
    pub rate_limit_hits: u32,
    pub cpu_pct: f64,
    pub memory_pct: f64,
    pub network_latency_ms: f64,
    pub timestamp: DateTime<Utc>,
}

impl PerformanceMetrics {
    /// Default observation stamped at `timestamp`.
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            success_rate: 1.0,
            avg_response_time_ms: 0.0,
            throughput_ops_per_sec: 0.0,
            error_rate: 0.0,
            rate_limit_hits: 0,
            cpu_pct: 0.0,
            memory_pct: 0.0,
            network_latency_ms: 0.0,
            timestamp,
        }
    }

    /// Observation carrying only host resource usage.
    pub fn resource_only(cpu_pct: f64, memory_pct: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            cpu_pct,
            memory_pct,
            ..Self::at(timestamp)
        }
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}
