//! Operating-system resource sampler.

use chrono::Utc;
use parking_lot::Mutex;
use sysinfo::{Disks, Networks, System};

use cadence_core::errors::MonitorError;
use cadence_core::models::SystemResources;
use cadence_core::traits::ResourceSampler;

struct SysinfoState {
    system: System,
    networks: Networks,
    disks: Disks,
}

/// Samples CPU, memory, disk, network counters, and load via `sysinfo`.
///
/// CPU usage is measured between consecutive calls, so the first sample
/// after construction may read low. Each call blocks on OS queries; async
/// callers should run it on the blocking pool.
pub struct SysinfoSampler {
    state: Mutex<SysinfoState>,
}

impl SysinfoSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            state: Mutex::new(SysinfoState {
                system,
                networks: Networks::new_with_refreshed_list(),
                disks: Disks::new_with_refreshed_list(),
            }),
        }
    }
}

impl Default for SysinfoSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceSampler for SysinfoSampler {
    fn sample(&self) -> Result<SystemResources, MonitorError> {
        let mut state = self.state.lock();
        state.system.refresh_cpu_usage();
        state.system.refresh_memory();
        state.networks.refresh();
        state.disks.refresh();

        let total_memory = state.system.total_memory();
        if total_memory == 0 {
            return Err(MonitorError::CollectionFailed {
                reason: "total memory reported as zero".to_string(),
            });
        }
        let available = state.system.available_memory();
        let memory_percent = (total_memory.saturating_sub(available)) as f64 / total_memory as f64 * 100.0;

        let (sent, received) = state
            .networks
            .iter()
            .fold((0u64, 0u64), |(tx, rx), (_, data)| {
                (
                    tx.saturating_add(data.total_transmitted()),
                    rx.saturating_add(data.total_received()),
                )
            });

        let load = System::load_average();

        Ok(SystemResources {
            cpu_percent: f64::from(state.system.global_cpu_usage()),
            memory_percent,
            memory_available_mb: available as f64 / (1024.0 * 1024.0),
            disk_usage_percent: disk_usage_percent(&state.disks),
            network_bytes_sent: sent,
            network_bytes_received: received,
            load_average: [load.one, load.five, load.fifteen],
            timestamp: Utc::now(),
        })
    }
}

/// Usage of the root mount, or of the largest disk when no root is listed.
fn disk_usage_percent(disks: &Disks) -> f64 {
    let chosen = disks
        .iter()
        .find(|d| d.mount_point() == std::path::Path::new("/"))
        .or_else(|| disks.iter().max_by_key(|d| d.total_space()));
    match chosen {
        Some(disk) if disk.total_space() > 0 => {
            let used = disk.total_space().saturating_sub(disk.available_space());
            used as f64 / disk.total_space() as f64 * 100.0
        }
        _ => 0.0,
    }
}
