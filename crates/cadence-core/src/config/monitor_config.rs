use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::batching_config::invalid;
use super::defaults;
use crate::errors::ConfigError;

/// Warning and critical levels for one resource.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub warning: f64,
    pub critical: f64,
}

impl ThresholdPair {
    pub const fn new(warning: f64, critical: f64) -> Self {
        Self { warning, critical }
    }
}

/// Alerting thresholds per resource. Network values are in Mbps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceThresholds {
    pub cpu: ThresholdPair,
    pub memory: ThresholdPair,
    pub disk: ThresholdPair,
    pub network_mbps: ThresholdPair,
    pub load_average: ThresholdPair,
}

impl Default for ResourceThresholds {
    fn default() -> Self {
        Self {
            cpu: ThresholdPair::new(defaults::DEFAULT_CPU_WARNING, defaults::DEFAULT_CPU_CRITICAL),
            memory: ThresholdPair::new(
                defaults::DEFAULT_MEMORY_WARNING,
                defaults::DEFAULT_MEMORY_CRITICAL,
            ),
            disk: ThresholdPair::new(defaults::DEFAULT_DISK_WARNING, defaults::DEFAULT_DISK_CRITICAL),
            network_mbps: ThresholdPair::new(
                defaults::DEFAULT_NETWORK_WARNING_MBPS,
                defaults::DEFAULT_NETWORK_CRITICAL_MBPS,
            ),
            load_average: ThresholdPair::new(
                defaults::DEFAULT_LOAD_WARNING,
                defaults::DEFAULT_LOAD_CRITICAL,
            ),
        }
    }
}

/// Resource monitor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub monitoring_interval_secs: f64,
    pub thresholds: ResourceThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            monitoring_interval_secs: defaults::DEFAULT_MONITORING_INTERVAL_SECS,
            thresholds: ResourceThresholds::default(),
        }
    }
}

impl MonitorConfig {
    pub fn monitoring_interval(&self) -> Duration {
        Duration::from_secs_f64(self.monitoring_interval_secs)
    }

    /// This configuration if valid, otherwise defaults.
    pub fn validated_or_default(self) -> Self {
        super::or_defaults(self, Self::validate)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.monitoring_interval_secs.is_finite() || self.monitoring_interval_secs <= 0.0 {
            return Err(invalid("monitor.monitoring_interval_secs", "must be positive"));
        }
        let t = &self.thresholds;
        for (field, pair) in [
            ("monitor.thresholds.cpu", t.cpu),
            ("monitor.thresholds.memory", t.memory),
            ("monitor.thresholds.disk", t.disk),
            ("monitor.thresholds.network_mbps", t.network_mbps),
            ("monitor.thresholds.load_average", t.load_average),
        ] {
            if pair.warning > pair.critical {
                return Err(invalid(field, "warning must not exceed critical"));
            }
        }
        Ok(())
    }
}
