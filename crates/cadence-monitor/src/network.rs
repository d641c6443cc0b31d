//! Network throughput derived from cumulative byte counters.

use cadence_core::models::SystemResources;

/// Megabits per second between two samples, or `None` if time did not
/// advance. Counter resets count as zero traffic.
pub fn speed_mbps(previous: &SystemResources, current: &SystemResources) -> Option<f64> {
    let elapsed = (current.timestamp - previous.timestamp).num_milliseconds() as f64 / 1000.0;
    if elapsed <= 0.0 {
        return None;
    }
    let sent = current.network_bytes_sent.saturating_sub(previous.network_bytes_sent);
    let received = current
        .network_bytes_received
        .saturating_sub(previous.network_bytes_received);
    let bits = (sent + received) as f64 * 8.0;
    Some(bits / (elapsed * 1024.0 * 1024.0))
}
