//! Periodic performance dashboard.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::models::{BatchExecutionResult, BatchJob, JobStatus, OperationType};
use cadence_core::BoundedHistory;
use cadence_engine::TypeSummary;

/// Executions averaged for dashboard throughput.
const RECENT_EXECUTIONS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordinatorOverview {
    pub running: bool,
    pub active_jobs: usize,
    pub queued_jobs: usize,
    pub max_concurrent_jobs: usize,
    pub circuit_breaker_active: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatistics {
    pub total_jobs: usize,
    pub successful_jobs: usize,
    pub failed_jobs: usize,
    pub cancelled_jobs: usize,
    pub success_rate: f64,
}

impl JobStatistics {
    pub fn from_completed(completed: &BoundedHistory<BatchJob>) -> Self {
        let mut stats = Self {
            total_jobs: completed.len(),
            ..Self::default()
        };
        for job in completed.iter() {
            match job.status {
                JobStatus::Completed => stats.successful_jobs += 1,
                JobStatus::Failed => stats.failed_jobs += 1,
                JobStatus::Cancelled => stats.cancelled_jobs += 1,
                JobStatus::Pending | JobStatus::Running => {}
            }
        }
        if stats.total_jobs > 0 {
            stats.success_rate = stats.successful_jobs as f64 / stats.total_jobs as f64;
        }
        stats
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardPerformance {
    pub average_throughput: f64,
    pub average_execution_time_secs: f64,
    pub system_cpu_pct: f64,
    pub system_memory_pct: f64,
}

impl DashboardPerformance {
    pub fn from_history(history: &BoundedHistory<BatchExecutionResult>, cpu_pct: f64, memory_pct: f64) -> Self {
        let recent: Vec<&BatchExecutionResult> = history.recent(RECENT_EXECUTIONS).collect();
        let (average_throughput, average_execution_time_secs) = if recent.is_empty() {
            (0.0, 0.0)
        } else {
            let n = recent.len() as f64;
            (
                recent.iter().map(|r| r.throughput).sum::<f64>() / n,
                recent.iter().map(|r| r.execution_time.as_secs_f64()).sum::<f64>() / n,
            )
        };
        Self {
            average_throughput,
            average_execution_time_secs,
            system_cpu_pct: cpu_pct,
            system_memory_pct: memory_pct,
        }
    }
}

/// Snapshot rebuilt every dashboard interval; reads may lag by one interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceDashboard {
    pub timestamp: DateTime<Utc>,
    pub coordinator: CoordinatorOverview,
    pub jobs: JobStatistics,
    pub performance: DashboardPerformance,
    pub batching: BTreeMap<OperationType, TypeSummary>,
}

impl PerformanceDashboard {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
