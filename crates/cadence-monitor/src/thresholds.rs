//! Per-sample threshold evaluation.

use cadence_core::config::{ResourceThresholds, ThresholdPair};
use cadence_core::models::{AlertLevel, ResourceAlert, ResourceKind, SystemResources};

/// Alerts raised by one sample: at most one per resource, critical taking
/// precedence over warning. Samples are judged independently.
pub fn evaluate(sample: &SystemResources, thresholds: &ResourceThresholds) -> Vec<ResourceAlert> {
    [
        (ResourceKind::Cpu, sample.cpu_percent, thresholds.cpu, "CPU usage", "%"),
        (ResourceKind::Memory, sample.memory_percent, thresholds.memory, "memory usage", "%"),
        (ResourceKind::Disk, sample.disk_usage_percent, thresholds.disk, "disk usage", "%"),
        (ResourceKind::Load, sample.load_average[0], thresholds.load_average, "system load", ""),
    ]
    .into_iter()
    .filter_map(|(resource, current, pair, label, unit)| {
        check(current, pair).map(|(level, threshold)| {
            let prefix = match level {
                AlertLevel::Critical => "Critical",
                AlertLevel::Warning => "High",
            };
            ResourceAlert {
                level,
                resource,
                current,
                threshold,
                message: format!("{prefix} {label}: {current:.1}{unit}"),
                timestamp: sample.timestamp,
            }
        })
    })
    .collect()
}

fn check(current: f64, pair: ThresholdPair) -> Option<(AlertLevel, f64)> {
    if current >= pair.critical {
        Some((AlertLevel::Critical, pair.critical))
    } else if current >= pair.warning {
        Some((AlertLevel::Warning, pair.warning))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(cpu: f64) -> SystemResources {
        SystemResources {
            cpu_percent: cpu,
            ..SystemResources::zeroed(chrono::Utc::now())
        }
    }

    #[test]
    fn critical_cpu_raises_single_alert() {
        let alerts = evaluate(&sample(90.0), &ResourceThresholds::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
        assert_eq!(alerts[0].resource, ResourceKind::Cpu);
        assert_eq!(alerts[0].threshold, 85.0);
        assert_eq!(alerts[0].message, "Critical CPU usage: 90.0%");
    }

    #[test]
    fn thresholds_are_inclusive() {
        let alerts = evaluate(&sample(70.0), &ResourceThresholds::default());
        assert_eq!(alerts[0].level, AlertLevel::Warning);
        assert!(evaluate(&sample(69.9), &ResourceThresholds::default()).is_empty());
    }

    #[test]
    fn load_uses_one_minute_average() {
        let loaded = SystemResources {
            load_average: [4.5, 0.1, 0.1],
            ..sample(0.0)
        };
        let alerts = evaluate(&loaded, &ResourceThresholds::default());
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].resource, ResourceKind::Load);
        assert_eq!(alerts[0].level, AlertLevel::Critical);
    }
}
