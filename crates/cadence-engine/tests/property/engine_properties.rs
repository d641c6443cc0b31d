//! Property tests for cadence-engine sizing invariants.

use proptest::prelude::*;

use cadence_core::config::BatchConfiguration;
use cadence_core::models::{BatchStrategy, OperationType, PerformanceMetrics};
use cadence_engine::sequence::{batch_ranges, partition};
use cadence_engine::AdaptiveBatchingEngine;

fn arb_metrics() -> impl Strategy<Value = PerformanceMetrics> {
    (
        0.0f64..=1.0,
        0.0f64..5_000.0,
        0.0f64..1_000.0,
        0.0f64..=1.0,
        0u32..10,
        0.0f64..=100.0,
        0.0f64..=100.0,
    )
        .prop_map(|(success, resp, throughput, error, hits, cpu, mem)| PerformanceMetrics {
            success_rate: success,
            avg_response_time_ms: resp,
            throughput_ops_per_sec: throughput,
            error_rate: error,
            rate_limit_hits: hits,
            cpu_pct: cpu,
            memory_pct: mem,
            ..PerformanceMetrics::default()
        })
}

fn arb_strategy() -> impl Strategy<Value = BatchStrategy> {
    prop::sample::select(BatchStrategy::ALL.to_vec())
}

fn arb_bounds() -> impl Strategy<Value = (usize, usize)> {
    (1usize..100).prop_flat_map(|min| (Just(min), min..min + 900))
}

proptest! {
    #[test]
    fn prop_batch_size_stays_within_bounds(
        (min, max) in arb_bounds(),
        strategy in arb_strategy(),
        steps in prop::collection::vec((arb_metrics(), 0usize..5_000), 1..40),
    ) {
        let config = BatchConfiguration {
            min_batch_size: min,
            max_batch_size: max,
            ..Default::default()
        };
        let engine = AdaptiveBatchingEngine::new(config);
        engine.set_active_strategy(OperationType::Write, strategy);

        for (metrics, pending) in steps {
            let size = engine.calculate_optimal_batch_size(OperationType::Write, &metrics, pending);
            prop_assert!(size >= min && size <= max, "size {size} outside [{min}, {max}]");
            engine.update_performance_metrics(OperationType::Write, metrics);
        }
    }

    #[test]
    fn prop_open_breaker_forces_min(
        metrics in arb_metrics(),
        pending in 0usize..5_000,
        strategy in arb_strategy(),
    ) {
        let engine = AdaptiveBatchingEngine::new(BatchConfiguration::default());
        engine.set_active_strategy(OperationType::Query, strategy);
        engine.update_performance_metrics(OperationType::Query, PerformanceMetrics {
            error_rate: 0.5,
            ..PerformanceMetrics::default()
        });
        prop_assert!(engine.is_circuit_open(OperationType::Query));

        let size = engine.calculate_optimal_batch_size(OperationType::Query, &metrics, pending);
        prop_assert_eq!(size, engine.config().min_batch_size);
    }

    #[test]
    fn prop_partition_preserves_order_and_sizes(
        items in prop::collection::vec(any::<u32>(), 0..500),
        size in 1usize..64,
    ) {
        let batches = partition(&items, size);
        let flattened: Vec<u32> = batches.iter().flatten().copied().collect();
        prop_assert_eq!(&flattened, &items);

        if let Some((last, full)) = batches.split_last() {
            prop_assert!(full.iter().all(|b| b.len() == size));
            prop_assert!(!last.is_empty() && last.len() <= size);
        }
        prop_assert_eq!(batches.len(), batch_ranges(items.len(), size).len());
    }

    #[test]
    fn prop_steady_metrics_do_not_oscillate(
        strategy in arb_strategy(),
        rounds in 5usize..30,
    ) {
        // Middling score, inside every threshold.
        let steady = PerformanceMetrics {
            success_rate: 0.97,
            avg_response_time_ms: 180.0,
            throughput_ops_per_sec: 50.0,
            error_rate: 0.02,
            cpu_pct: 40.0,
            memory_pct: 40.0,
            ..PerformanceMetrics::default()
        };
        let engine = AdaptiveBatchingEngine::new(BatchConfiguration::default());
        engine.set_active_strategy(OperationType::Update, strategy);

        let mut sizes = Vec::with_capacity(rounds);
        for _ in 0..rounds {
            engine.update_performance_metrics(OperationType::Update, steady.clone());
            sizes.push(engine.calculate_optimal_batch_size(OperationType::Update, &steady, 100));
        }
        // Sizes move monotonically; no back-and-forth.
        let rising = sizes.windows(2).all(|w| w[0] <= w[1]);
        let falling = sizes.windows(2).all(|w| w[0] >= w[1]);
        prop_assert!(rising || falling, "oscillating sizes: {sizes:?}");
    }
}
