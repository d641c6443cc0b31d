//! Resource optimization recommendations.

use serde::{Deserialize, Serialize};

use cadence_core::config::{ResourceThresholds, ThresholdPair};
use cadence_core::constants::SUMMARY_WINDOW;
use cadence_core::models::{ResourceKind, SystemResources};
use cadence_core::BoundedHistory;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceRecommendation {
    pub resource: ResourceKind,
    pub severity: Severity,
    pub recommendation: String,
    pub details: String,
}

pub fn recommend(
    latest: Option<&SystemResources>,
    network_speeds: &BoundedHistory<f64>,
    thresholds: &ResourceThresholds,
) -> Vec<ResourceRecommendation> {
    let Some(latest) = latest else {
        return Vec::new();
    };
    let mut out = Vec::new();
    let mut push = |resource, value: f64, pair: ThresholdPair, advice: &str, details: String| {
        if value > pair.warning {
            out.push(ResourceRecommendation {
                resource,
                severity: if value > pair.critical {
                    Severity::High
                } else {
                    Severity::Medium
                },
                recommendation: advice.to_string(),
                details,
            });
        }
    };

    push(
        ResourceKind::Cpu,
        latest.cpu_percent,
        thresholds.cpu,
        "Reduce batch sizes and throttle request rate",
        format!("Current CPU usage: {:.1}%", latest.cpu_percent),
    );
    push(
        ResourceKind::Memory,
        latest.memory_percent,
        thresholds.memory,
        "Use smaller batches and release buffers between batches",
        format!("Current memory usage: {:.1}%", latest.memory_percent),
    );
    push(
        ResourceKind::Disk,
        latest.disk_usage_percent,
        thresholds.disk,
        "Clean up temporary files and rotate logs",
        format!("Current disk usage: {:.1}%", latest.disk_usage_percent),
    );
    if !network_speeds.is_empty() {
        let recent: Vec<f64> = network_speeds.recent(SUMMARY_WINDOW).copied().collect();
        let avg = recent.iter().sum::<f64>() / recent.len() as f64;
        push(
            ResourceKind::Network,
            avg,
            thresholds.network_mbps,
            "Queue requests and shrink transfer sizes",
            format!("Average network speed: {avg:.1} Mbps"),
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_escalates_past_critical() {
        let sample = SystemResources {
            cpu_percent: 90.0,
            memory_percent: 80.0,
            ..SystemResources::zeroed(chrono::Utc::now())
        };
        let recs = recommend(Some(&sample), &BoundedHistory::new(10), &ResourceThresholds::default());
        assert_eq!(recs.len(), 2);
        assert_eq!((recs[0].resource, recs[0].severity), (ResourceKind::Cpu, Severity::High));
        assert_eq!((recs[1].resource, recs[1].severity), (ResourceKind::Memory, Severity::Medium));
    }

    #[test]
    fn network_uses_recent_average() {
        let mut speeds = BoundedHistory::new(100);
        for _ in 0..20 {
            speeds.push(10.0);
        }
        for _ in 0..10 {
            speeds.push(150.0);
        }
        let sample = SystemResources::zeroed(chrono::Utc::now());
        let recs = recommend(Some(&sample), &speeds, &ResourceThresholds::default());
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].resource, ResourceKind::Network);
        assert_eq!(recs[0].severity, Severity::Medium);
    }

    #[test]
    fn no_samples_no_recommendations() {
        assert!(recommend(None, &BoundedHistory::new(10), &ResourceThresholds::default()).is_empty());
    }
}
