use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::models::BatchStrategy;

/// Recent performance for one operation type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeSummary {
    pub current_batch_size: usize,
    pub active_strategy: BatchStrategy,
    pub circuit_breaker_active: bool,
    pub avg_response_time_ms: f64,
    pub avg_throughput: f64,
    pub avg_success_rate: f64,
    pub measurements: usize,
    pub last_adaptation: DateTime<Utc>,
}
