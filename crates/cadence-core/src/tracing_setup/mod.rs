//! Tracing subscriber setup and structured log events.

pub mod events;

use tracing_subscriber::EnvFilter;

use crate::config::defaults::{DEFAULT_LOG_FILTER, LOG_ENV_VAR};

/// Install a JSON formatter filtered by `CADENCE_LOG` (default `info`).
///
/// Returns `false` when a global subscriber is already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(false)
        .try_init()
        .is_ok()
}
