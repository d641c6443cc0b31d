use serde::{Deserialize, Serialize};

use super::{OperationType, PerformanceMetrics, Priority};

/// Inputs handed to a prediction provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionFeatures {
    pub operation_type: OperationType,
    pub pending_operations: usize,
    pub current_batch_size: usize,
    pub metrics: PerformanceMetrics,
}

/// A provider's suggested batch size. The caller clamps it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchPrediction {
    pub batch_size: usize,
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationGoal {
    Latency,
    Throughput,
    Resource,
    Balanced,
}

/// What a prediction should optimize for, derived from job priority.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationTarget {
    pub goal: OptimizationGoal,
    pub max_response_time_ms: Option<f64>,
    pub min_throughput: Option<f64>,
    pub min_success_rate: Option<f64>,
    pub max_cpu_pct: Option<f64>,
    pub max_memory_pct: Option<f64>,
}

impl OptimizationTarget {
    pub fn balanced() -> Self {
        Self {
            goal: OptimizationGoal::Balanced,
            max_response_time_ms: None,
            min_throughput: None,
            min_success_rate: None,
            max_cpu_pct: None,
            max_memory_pct: None,
        }
    }

    pub fn for_priority(priority: Priority) -> Self {
        match priority {
            Priority::Critical => Self {
                goal: OptimizationGoal::Latency,
                max_response_time_ms: Some(100.0),
                min_success_rate: Some(0.99),
                ..Self::balanced()
            },
            Priority::High => Self {
                goal: OptimizationGoal::Throughput,
                min_throughput: Some(100.0),
                max_response_time_ms: Some(200.0),
                ..Self::balanced()
            },
            Priority::Low => Self {
                goal: OptimizationGoal::Resource,
                max_cpu_pct: Some(60.0),
                max_memory_pct: Some(70.0),
                ..Self::balanced()
            },
            Priority::Normal => Self::balanced(),
        }
    }
}

impl Default for OptimizationTarget {
    fn default() -> Self {
        Self::balanced()
    }
}
