//! Read models and point-in-time export.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::errors::MonitorError;
use cadence_core::models::SystemResources;

/// Highest usage seen since the monitor was created.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PeakUsage {
    pub cpu: f64,
    pub memory: f64,
    pub disk: f64,
}

impl PeakUsage {
    pub fn observe(&mut self, sample: &SystemResources) {
        self.cpu = self.cpu.max(sample.cpu_percent);
        self.memory = self.memory.max(sample.memory_percent);
        self.disk = self.disk.max(sample.disk_usage_percent);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentMetrics {
    /// Latest sample, or a zeroed one before the first sample.
    pub system: SystemResources,
    pub network_speed_mbps: f64,
    pub monitoring_active: bool,
    pub peak_usage: PeakUsage,
    pub baseline: Option<SystemResources>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonitorSnapshot {
    pub exported_at: DateTime<Utc>,
    pub history: Vec<SystemResources>,
    pub network_speeds_mbps: Vec<f64>,
    pub peak_usage: PeakUsage,
    pub baseline: Option<SystemResources>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Json,
    Yaml,
}

impl ExportFormat {
    pub fn render(&self, snapshot: &MonitorSnapshot) -> Result<String, MonitorError> {
        let rendered = match self {
            Self::Json => serde_json::to_string_pretty(snapshot).map_err(|e| e.to_string()),
            Self::Yaml => serde_yaml::to_string(snapshot).map_err(|e| e.to_string()),
        };
        rendered.map_err(|reason| MonitorError::SerializationFailed { reason })
    }
}

impl MonitorSnapshot {
    pub fn write_to(&self, path: &Path, format: ExportFormat) -> Result<(), MonitorError> {
        let body = format.render(self)?;
        std::fs::write(path, body).map_err(|e| MonitorError::ExportFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}
