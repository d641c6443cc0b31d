use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Host resource snapshot produced by a sampler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemResources {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub memory_available_mb: f64,
    pub disk_usage_percent: f64,
    /// Cumulative counter since boot.
    pub network_bytes_sent: u64,
    /// Cumulative counter since boot.
    pub network_bytes_received: u64,
    /// 1, 5 and 15 minute load averages.
    pub load_average: [f64; 3],
    pub timestamp: DateTime<Utc>,
}

impl SystemResources {
    /// All-zero snapshot, used when collection fails.
    pub fn zeroed(timestamp: DateTime<Utc>) -> Self {
        Self {
            cpu_percent: 0.0,
            memory_percent: 0.0,
            memory_available_mb: 0.0,
            disk_usage_percent: 0.0,
            network_bytes_sent: 0,
            network_bytes_received: 0,
            load_average: [0.0; 3],
            timestamp,
        }
    }

    pub fn total_network_bytes(&self) -> u64 {
        self.network_bytes_sent.saturating_add(self.network_bytes_received)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Cpu,
    Memory,
    Disk,
    Network,
    Load,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Disk => "disk",
            Self::Network => "network",
            Self::Load => "load",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertLevel {
    Warning,
    Critical,
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("warning"),
            Self::Critical => f.write_str("critical"),
        }
    }
}

/// A threshold crossing observed on a single sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceAlert {
    pub level: AlertLevel,
    pub resource: ResourceKind,
    pub current: f64,
    pub threshold: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Direction of a resource over a window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
    Stable,
}
