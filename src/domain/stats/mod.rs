//! Member statistics domain module.
//!
//! Per-member totals are accumulated from member intervals by month; this
//! module holds the pure rules on top of those totals.

mod milestone;

pub use milestone::{crossed_milestone, Milestone, DEFAULT_MILESTONE_HOURS};
