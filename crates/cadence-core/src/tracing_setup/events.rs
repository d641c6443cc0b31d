//! Structured log events for the batching system.
//!
//! Each function emits one `tracing` event with a stable `event` field so
//! log pipelines can filter on it.

use std::path::Path;

use crate::errors::ConfigError;
use crate::models::{AlertLevel, BatchStrategy, OperationType, ResourceAlert};

pub fn emit_config_fallback(path: Option<&Path>, error: &ConfigError) {
    tracing::warn!(
        event = "config_fallback",
        path = %path.map(|p| p.display().to_string()).unwrap_or_default(),
        error = %error,
        "configuration invalid, using defaults"
    );
}

pub fn emit_listener_panicked(registry: &str, message: &str) {
    tracing::error!(event = "listener_panicked", registry, message, "listener panicked");
}

pub fn emit_batch_size_adapted(
    operation_type: OperationType,
    strategy: BatchStrategy,
    from: usize,
    to: usize,
    score: f64,
) {
    tracing::info!(
        event = "batch_size_adapted",
        operation_type = %operation_type,
        strategy = %strategy,
        from,
        to,
        score,
        "batch size adapted"
    );
}

pub fn emit_engine_breaker_opened(operation_type: OperationType, error_rate: f64, rate_limit_hits: u32) {
    tracing::warn!(
        event = "circuit_breaker_opened",
        scope = "engine",
        operation_type = %operation_type,
        error_rate,
        rate_limit_hits,
        "circuit breaker activated"
    );
}

pub fn emit_engine_breaker_closed(operation_type: OperationType) {
    tracing::info!(
        event = "circuit_breaker_closed",
        scope = "engine",
        operation_type = %operation_type,
        "circuit breaker deactivated"
    );
}

pub fn emit_coordinator_breaker_opened(failures: usize, reset_after_secs: u64) {
    tracing::warn!(
        event = "circuit_breaker_opened",
        scope = "coordinator",
        failures,
        reset_after_secs,
        "job dispatch paused"
    );
}

pub fn emit_coordinator_breaker_closed() {
    tracing::info!(
        event = "circuit_breaker_closed",
        scope = "coordinator",
        "job dispatch resumed"
    );
}

pub fn emit_resource_alert(alert: &ResourceAlert) {
    match alert.level {
        AlertLevel::Critical => tracing::error!(
            event = "resource_alert",
            level = %alert.level,
            resource = %alert.resource,
            current = alert.current,
            threshold = alert.threshold,
            "{}",
            alert.message
        ),
        AlertLevel::Warning => tracing::warn!(
            event = "resource_alert",
            level = %alert.level,
            resource = %alert.resource,
            current = alert.current,
            threshold = alert.threshold,
            "{}",
            alert.message
        ),
    }
}

pub fn emit_sample_failed(error: &dyn std::fmt::Display) {
    tracing::warn!(event = "resource_sample_failed", error = %error, "using zeroed snapshot");
}

pub fn emit_job_started(job_id: &str, operation_type: OperationType, operations: usize) {
    tracing::info!(
        event = "job_started",
        job_id,
        operation_type = %operation_type,
        operations,
        "job started"
    );
}

pub fn emit_job_finished(job_id: &str, success: bool, processed: usize, failed: usize, elapsed_ms: u128) {
    tracing::info!(
        event = "job_finished",
        job_id,
        success,
        processed,
        failed,
        elapsed_ms = elapsed_ms as u64,
        "job finished"
    );
}

pub fn emit_concurrency_reduced(from: usize, to: usize) {
    tracing::warn!(
        event = "concurrency_reduced",
        from,
        to,
        "critical resource alert, reducing concurrent jobs"
    );
}
