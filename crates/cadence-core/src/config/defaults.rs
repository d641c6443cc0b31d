//! Compiled defaults for every configuration value.

// Batching engine
pub const DEFAULT_MIN_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_BATCH_SIZE: usize = 500;
pub const DEFAULT_TARGET_RESPONSE_TIME_MS: f64 = 500.0;
pub const DEFAULT_MAX_ERROR_RATE: f64 = 0.05;
pub const DEFAULT_RATE_LIMIT_THRESHOLD: u32 = 3;
pub const DEFAULT_CPU_THRESHOLD_PCT: f64 = 80.0;
pub const DEFAULT_MEMORY_THRESHOLD_PCT: f64 = 85.0;
pub const DEFAULT_ADAPTATION_SENSITIVITY: f64 = 0.2;

// Resource monitor
pub const DEFAULT_MONITORING_INTERVAL_SECS: f64 = 5.0;
pub const DEFAULT_CPU_WARNING: f64 = 70.0;
pub const DEFAULT_CPU_CRITICAL: f64 = 85.0;
pub const DEFAULT_MEMORY_WARNING: f64 = 75.0;
pub const DEFAULT_MEMORY_CRITICAL: f64 = 90.0;
pub const DEFAULT_DISK_WARNING: f64 = 80.0;
pub const DEFAULT_DISK_CRITICAL: f64 = 95.0;
pub const DEFAULT_NETWORK_WARNING_MBPS: f64 = 100.0;
pub const DEFAULT_NETWORK_CRITICAL_MBPS: f64 = 500.0;
pub const DEFAULT_LOAD_WARNING: f64 = 2.0;
pub const DEFAULT_LOAD_CRITICAL: f64 = 4.0;

// Coordinator
pub const DEFAULT_MAX_CONCURRENT_JOBS: usize = 5;
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_MAX_RETRY_ATTEMPTS: u32 = 3;
pub const DEFAULT_CIRCUIT_BREAKER_THRESHOLD: usize = 5;
pub const DEFAULT_CIRCUIT_BREAKER_TIMEOUT_SECS: u64 = 300;
pub const DEFAULT_DASHBOARD_UPDATE_INTERVAL_SECS: u64 = 30;
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;
pub const DEFAULT_PERFORMANCE_TRACKING_ENABLED: bool = true;
pub const DEFAULT_AUTO_OPTIMIZATION_ENABLED: bool = true;

// Assumed metrics for jobs with no fresh observation
pub const DEFAULT_JOB_SUCCESS_RATE: f64 = 0.95;
pub const DEFAULT_JOB_RESPONSE_TIME_MS: f64 = 200.0;
pub const DEFAULT_JOB_THROUGHPUT: f64 = 50.0;
pub const DEFAULT_JOB_ERROR_RATE: f64 = 0.02;
pub const DEFAULT_JOB_NETWORK_LATENCY_MS: f64 = 10.0;

// Tracing
pub const LOG_ENV_VAR: &str = "CADENCE_LOG";
pub const DEFAULT_LOG_FILTER: &str = "info";
