//! Builders for common inputs.

use chrono::{DateTime, TimeZone, Utc};
use serde_json::json;

use cadence_core::models::{Operation, PerformanceMetrics, SystemResources};

/// Fixed epoch for deterministic tests.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default()
}

/// `n` operations carrying their index.
pub fn operations(n: usize) -> Vec<Operation> {
    (0..n).map(|i| json!({ "id": i })).collect()
}

/// Scores about 0.9 against default targets with an empty history.
pub fn healthy_metrics(timestamp: DateTime<Utc>) -> PerformanceMetrics {
    PerformanceMetrics {
        success_rate: 1.0,
        avg_response_time_ms: 125.0,
        throughput_ops_per_sec: 40.0,
        error_rate: 0.0,
        rate_limit_hits: 0,
        cpu_pct: 20.0,
        memory_pct: 20.0,
        network_latency_ms: 5.0,
        timestamp,
    }
}

/// Trips the engine breaker under default configuration.
pub fn failing_metrics(timestamp: DateTime<Utc>) -> PerformanceMetrics {
    PerformanceMetrics {
        success_rate: 0.6,
        avg_response_time_ms: 900.0,
        throughput_ops_per_sec: 5.0,
        error_rate: 0.4,
        rate_limit_hits: 5,
        cpu_pct: 50.0,
        memory_pct: 50.0,
        network_latency_ms: 50.0,
        timestamp,
    }
}

pub fn resources(cpu: f64, memory: f64, timestamp: DateTime<Utc>) -> SystemResources {
    SystemResources {
        cpu_percent: cpu,
        memory_percent: memory,
        memory_available_mb: 4096.0,
        disk_usage_percent: 40.0,
        network_bytes_sent: 0,
        network_bytes_received: 0,
        load_average: [0.5, 0.5, 0.5],
        timestamp,
    }
}
