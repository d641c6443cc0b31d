//! Time source abstraction.

use chrono::{DateTime, Utc};

/// Wall-clock source. Breaker deadlines, trend windows, and timestamps
/// all read time through this trait.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Reads `Utc::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
