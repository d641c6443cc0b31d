//! Property tests for coordinator dispatch order and admission.

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use cadence_core::events::{JobEventHandler, JobStartedEvent};
use cadence_core::models::{OperationType, Priority};
use cadence_core::CadenceConfig;
use cadence_coordinator::BatchCoordinator;
use test_fixtures::{epoch, operations, ManualClock, Recorder, RecordingExecutor, ScriptedSampler};

#[derive(Default)]
struct StartOrder(Recorder<String>);

impl JobEventHandler for StartOrder {
    fn on_job_started(&self, event: &JobStartedEvent) {
        self.0.push(event.job_id.clone());
    }
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop::sample::select(vec![Priority::Critical, Priority::High, Priority::Normal, Priority::Low])
}

fn coordinator(max_concurrent: usize, executor: Arc<RecordingExecutor>) -> BatchCoordinator {
    let mut config = CadenceConfig::default();
    config.coordinator.max_concurrent_jobs = max_concurrent;
    config.coordinator.auto_optimization_enabled = false;
    BatchCoordinator::builder(config, executor)
        .clock(Arc::new(ManualClock::new(epoch())))
        .sampler(Arc::new(ScriptedSampler::new()))
        .build()
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .start_paused(true)
        .build()
        .unwrap()
}

/// Drive ticks until idle; returns the largest active count observed.
async fn drain(coordinator: &BatchCoordinator) -> usize {
    let mut peak = 0;
    for _ in 0..2_000 {
        let status = coordinator.queue_status();
        if status.queued_jobs == 0 && status.active_jobs == 0 {
            break;
        }
        coordinator.tick().await;
        peak = peak.max(coordinator.active_job_count());
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    peak
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_dispatch_follows_priority_then_submission(priorities in prop::collection::vec(arb_priority(), 1..12)) {
        let rt = runtime();
        let order = rt.block_on(async {
            let coordinator = coordinator(1, Arc::new(RecordingExecutor::new()));
            let recorder = Arc::new(StartOrder::default());
            coordinator.register_handler(recorder.clone());
            for (i, priority) in priorities.iter().enumerate() {
                coordinator
                    .submit_job(operations(3), OperationType::Write, *priority, Some(format!("job-{i}")))
                    .unwrap();
            }
            drain(&coordinator).await;
            recorder.0.snapshot()
        });

        let mut expected: Vec<usize> = (0..priorities.len()).collect();
        expected.sort_by_key(|i| std::cmp::Reverse(priorities[*i].weight()));
        let expected: Vec<String> = expected.into_iter().map(|i| format!("job-{i}")).collect();
        prop_assert_eq!(order, expected);
    }

    #[test]
    fn prop_active_jobs_never_exceed_limit(limit in 1usize..4, jobs in 1usize..10) {
        let rt = runtime();
        let executor = Arc::new(RecordingExecutor::with_delay(Duration::from_millis(20)));
        let (peak, completed) = rt.block_on(async {
            let coordinator = coordinator(limit, executor.clone());
            for _ in 0..jobs {
                coordinator.submit_job(operations(4), OperationType::Read, Priority::Normal, None).unwrap();
            }
            let peak = drain(&coordinator).await;
            (peak, coordinator.queue_status().completed_jobs)
        });

        prop_assert!(peak <= limit);
        prop_assert!(executor.max_in_flight() <= limit);
        prop_assert_eq!(completed, jobs);
    }
}
