//! Cooperative cancellation for running jobs.
//!
//! A running job is never interrupted mid-batch. The coordinator records a
//! [`CancelRequest`] on the job's token and the worker checks it before
//! each batch.

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// When and why a job was asked to stop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelRequest {
    pub requested_at: DateTime<Utc>,
    pub reason: String,
}

/// Shared between the job table and its worker. The first request wins;
/// later ones are ignored.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    request: Arc<OnceLock<CancelRequest>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cancellation request. Returns `false` if one was already
    /// recorded.
    pub fn cancel(&self, reason: impl Into<String>, requested_at: DateTime<Utc>) -> bool {
        self.request
            .set(CancelRequest {
                requested_at,
                reason: reason.into(),
            })
            .is_ok()
    }

    pub fn is_cancelled(&self) -> bool {
        self.request.get().is_some()
    }

    pub fn request(&self) -> Option<&CancelRequest> {
        self.request.get()
    }
}
