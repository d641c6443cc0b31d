//! Property tests for cadence-monitor analysis helpers.

use std::collections::HashSet;

use proptest::prelude::*;

use cadence_core::config::ResourceThresholds;
use cadence_core::models::{SystemResources, Trend};
use cadence_monitor::analysis::{availability, classify};
use cadence_monitor::thresholds::evaluate;

fn arb_sample() -> impl Strategy<Value = SystemResources> {
    (0.0f64..150.0, 0.0f64..150.0, 0.0f64..150.0, 0.0f64..10.0).prop_map(|(cpu, mem, disk, load)| {
        SystemResources {
            cpu_percent: cpu,
            memory_percent: mem,
            disk_usage_percent: disk,
            load_average: [load, load, load],
            ..SystemResources::zeroed(chrono::Utc::now())
        }
    })
}

proptest! {
    #[test]
    fn prop_availability_in_unit_interval(sample in arb_sample(), speed in 0.0f64..2_000.0) {
        let a = availability(Some(&sample), Some(speed), 500.0);
        for v in [a.cpu, a.memory, a.disk, a.network] {
            prop_assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn prop_at_most_one_alert_per_resource(sample in arb_sample()) {
        let alerts = evaluate(&sample, &ResourceThresholds::default());
        let kinds: HashSet<_> = alerts.iter().map(|a| a.resource).collect();
        prop_assert_eq!(kinds.len(), alerts.len());
        for alert in &alerts {
            prop_assert!(alert.current >= alert.threshold);
        }
    }

    #[test]
    fn prop_constant_series_is_stable(value in 0.0f64..100.0, len in 0usize..50) {
        prop_assert_eq!(classify(&vec![value; len]), Trend::Stable);
    }
}
