//! Data model behavior tests.

use cadence_core::models::{
    BatchStrategy, JobStatus, OperationType, OptimizationGoal, OptimizationTarget, Priority,
    SystemResources,
};

#[test]
fn terminal_statuses() {
    assert!(!JobStatus::Pending.is_terminal());
    assert!(!JobStatus::Running.is_terminal());
    assert!(JobStatus::Completed.is_terminal());
    assert!(JobStatus::Failed.is_terminal());
    assert!(JobStatus::Cancelled.is_terminal());
}

#[test]
fn critical_outranks_everything() {
    let mut priorities = vec![Priority::Low, Priority::Critical, Priority::Normal, Priority::High];
    priorities.sort_by_key(|p| std::cmp::Reverse(p.weight()));
    assert_eq!(
        priorities,
        vec![Priority::Critical, Priority::High, Priority::Normal, Priority::Low]
    );
}

#[test]
fn optimization_target_follows_priority() {
    let critical = OptimizationTarget::for_priority(Priority::Critical);
    assert_eq!(critical.goal, OptimizationGoal::Latency);
    assert_eq!(critical.max_response_time_ms, Some(100.0));
    assert_eq!(critical.min_success_rate, Some(0.99));

    let high = OptimizationTarget::for_priority(Priority::High);
    assert_eq!(high.goal, OptimizationGoal::Throughput);
    assert_eq!(high.min_throughput, Some(100.0));

    let low = OptimizationTarget::for_priority(Priority::Low);
    assert_eq!(low.goal, OptimizationGoal::Resource);
    assert_eq!(low.max_cpu_pct, Some(60.0));

    assert_eq!(OptimizationTarget::for_priority(Priority::Normal), OptimizationTarget::balanced());
}

#[test]
fn enums_serialize_with_stable_names() {
    assert_eq!(serde_json::to_string(&OperationType::BulkCreate).unwrap(), "\"bulk_create\"");
    assert_eq!(serde_json::to_string(&Priority::Critical).unwrap(), "\"critical\"");
    assert_eq!(serde_json::to_string(&BatchStrategy::Adaptive).unwrap(), "\"adaptive\"");
    assert_eq!(BatchStrategy::default(), BatchStrategy::Adaptive);
    assert_eq!(OperationType::ALL.len(), 6);
}

#[test]
fn zeroed_resources_have_no_usage() {
    let now = chrono::Utc::now();
    let zeroed = SystemResources::zeroed(now);
    assert_eq!(zeroed.cpu_percent, 0.0);
    assert_eq!(zeroed.total_network_bytes(), 0);
    assert_eq!(zeroed.timestamp, now);
}
