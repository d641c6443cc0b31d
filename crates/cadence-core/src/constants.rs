//! Shared limits used across the workspace.

/// Cap for per-type performance history, monitor sample history,
/// completed jobs, and execution results.
pub const HISTORY_CAPACITY: usize = 1000;

/// Cap for derived network speed history.
pub const NETWORK_SPEED_CAPACITY: usize = 100;

/// Samples required before the monitor computes a baseline or forecast.
pub const BASELINE_WINDOW: usize = 10;

/// Number of recent history entries used for the throughput normalizer.
pub const THROUGHPUT_WINDOW: usize = 50;

/// Recent completions inspected by the coordinator circuit breaker.
pub const BREAKER_WINDOW: usize = 10;

/// Recent samples used for summaries and confidence estimation.
pub const SUMMARY_WINDOW: usize = 10;

/// Smoothing factor for per-strategy score averages.
pub const STRATEGY_EMA_ALPHA: f64 = 0.1;

/// Points of drift tolerated before a trend counts as moving.
pub const TREND_BAND: f64 = 5.0;
