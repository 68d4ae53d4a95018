//! Clock adapters.

use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use tokio::time::Instant;

use crate::domain::foundation::Timestamp;
use crate::ports::Clock;

/// Wall clock driven by the tokio timer.
///
/// Anchored to the wall time at construction and advanced by
/// `tokio::time::Instant`, so paused-time tests see timestamps move exactly
/// as far as the runtime clock does.
#[derive(Debug, Clone)]
pub struct TokioClock {
    anchor_wall: DateTime<Utc>,
    anchor: Instant,
}

impl TokioClock {
    pub fn new() -> Self {
        Self::anchored_at(Timestamp::now())
    }

    /// A clock that reads `start` right now.
    pub fn anchored_at(start: Timestamp) -> Self {
        Self {
            anchor_wall: *start.as_datetime(),
            anchor: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TokioClock {
    fn now(&self) -> Timestamp {
        let elapsed = Duration::from_std(self.anchor.elapsed()).unwrap_or_else(|_| Duration::zero());
        Timestamp::from_datetime(self.anchor_wall + elapsed)
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    pub fn set(&self, at: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = at;
    }

    pub fn advance_secs(&self, secs: u64) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.plus_secs(secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}
