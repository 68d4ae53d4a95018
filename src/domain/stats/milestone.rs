//! Cumulative call-time milestones.

use serde::{Deserialize, Serialize};

/// Default milestone step: every ten hours of cumulative call time.
pub const DEFAULT_MILESTONE_HOURS: u32 = 10;

const SECONDS_PER_HOUR: i64 = 3600;

/// A cumulative call-time threshold crossed by one recorded interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    /// The highest threshold reached, in hours.
    pub hours: i64,
    /// Total after the interval was recorded, in seconds.
    pub total_secs: i64,
}

/// Detects whether moving from `before_secs` to `after_secs` crosses a
/// multiple of `step_hours`.
///
/// When several steps are crossed at once only the highest is reported.
pub fn crossed_milestone(before_secs: i64, after_secs: i64, step_hours: u32) -> Option<Milestone> {
    let step = i64::from(step_hours.max(1)) * SECONDS_PER_HOUR;
    let before = before_secs.max(0) / step;
    let after = after_secs.max(0) / step;

    if after > before {
        Some(Milestone {
            hours: after * i64::from(step_hours.max(1)),
            total_secs: after_secs,
        })
    } else {
        None
    }
}
