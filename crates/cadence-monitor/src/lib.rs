//! # cadence-monitor
//!
//! Samples host resources on an interval, raises threshold alerts, and
//! derives availability, trends, and exhaustion forecasts from the bounded
//! sample history.

pub mod analysis;
pub mod monitor;
pub mod network;
pub mod recommendations;
pub mod sampler;
pub mod snapshot;
pub mod thresholds;

pub use analysis::{ExhaustionForecast, ResourceAvailability, TrendReport};
pub use monitor::ResourceMonitor;
pub use recommendations::{ResourceRecommendation, Severity};
pub use sampler::SysinfoSampler;
pub use snapshot::{CurrentMetrics, ExportFormat, MonitorSnapshot, PeakUsage};
