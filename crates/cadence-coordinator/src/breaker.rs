//! Job-level circuit breaker.
//!
//! Opens when enough recently completed jobs failed and pauses dispatch
//! until a deadline passes. Only jobs completed since the breaker last
//! closed are counted, so the failures that opened it cannot reopen it.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use cadence_core::constants::BREAKER_WINDOW;
use cadence_core::models::{BatchJob, JobStatus};
use cadence_core::BoundedHistory;

/// Result of one breaker evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakerCheck {
    /// Dispatch may proceed.
    Closed,
    /// Deadline reached this evaluation; dispatch may proceed.
    JustClosed,
    /// Tripped this evaluation with the given failure count.
    JustOpened { failures: usize },
    /// Still waiting for the deadline.
    Open,
}

impl BreakerCheck {
    pub fn allows_dispatch(&self) -> bool {
        matches!(self, Self::Closed | Self::JustClosed)
    }
}

/// Point-in-time view for callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitBreakerStatus {
    pub active: bool,
    pub reset_at: Option<DateTime<Utc>>,
    pub recent_failures: usize,
    pub threshold: usize,
}

#[derive(Debug, Clone)]
pub struct CoordinatorBreaker {
    threshold: usize,
    timeout: Duration,
    active: bool,
    reset_at: Option<DateTime<Utc>>,
    counting_since: Option<DateTime<Utc>>,
}

impl CoordinatorBreaker {
    pub fn new(threshold: usize, timeout: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            timeout,
            active: false,
            reset_at: None,
            counting_since: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        self.reset_at
    }

    /// Failed jobs among the last ten completed since the breaker last closed.
    pub fn recent_failures(&self, completed: &BoundedHistory<BatchJob>) -> usize {
        completed
            .iter()
            .rev()
            .filter(|job| match (self.counting_since, job.completed_at) {
                (Some(since), Some(done)) => done >= since,
                (Some(_), None) => false,
                (None, _) => true,
            })
            .take(BREAKER_WINDOW)
            .filter(|job| job.status == JobStatus::Failed)
            .count()
    }

    pub fn evaluate(&mut self, now: DateTime<Utc>, completed: &BoundedHistory<BatchJob>) -> BreakerCheck {
        if self.active {
            return match self.reset_at {
                Some(deadline) if now < deadline => BreakerCheck::Open,
                _ => {
                    self.active = false;
                    self.reset_at = None;
                    self.counting_since = Some(now);
                    BreakerCheck::JustClosed
                }
            };
        }

        let failures = self.recent_failures(completed);
        if failures >= self.threshold {
            self.active = true;
            self.reset_at = chrono::Duration::from_std(self.timeout)
                .ok()
                .and_then(|t| now.checked_add_signed(t));
            return BreakerCheck::JustOpened { failures };
        }
        BreakerCheck::Closed
    }

    pub fn status(&self, completed: &BoundedHistory<BatchJob>) -> CircuitBreakerStatus {
        CircuitBreakerStatus {
            active: self.active,
            reset_at: self.reset_at,
            recent_failures: self.recent_failures(completed),
            threshold: self.threshold,
        }
    }
}
