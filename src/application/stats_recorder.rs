//! StatsRecorder - Adds member intervals to the monthly ledger.
//!
//! Each interval is credited to the month its member joined in. When the
//! member's all-time total crosses a milestone, the group hears about it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::session::MemberInterval;
use crate::domain::stats::{crossed_milestone, Milestone, DEFAULT_MILESTONE_HOURS};
use crate::domain::Announcement;
use crate::ports::{MemberStatsRepository, Notifier};

pub struct StatsRecorder {
    stats: Arc<dyn MemberStatsRepository>,
    notifier: Arc<dyn Notifier>,
    milestone_hours: u32,
}

impl StatsRecorder {
    pub fn new(stats: Arc<dyn MemberStatsRepository>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            stats,
            notifier,
            milestone_hours: DEFAULT_MILESTONE_HOURS,
        }
    }

    pub fn with_milestone_hours(mut self, hours: u32) -> Self {
        self.milestone_hours = hours.max(1);
        self
    }

    /// Records every interval; a failure skips only the interval it hit.
    /// A failed total read loses the milestone check, never the interval.
    ///
    /// Returns the milestones reached.
    pub async fn record(&self, intervals: &[MemberInterval]) -> Vec<Milestone> {
        let mut reached = Vec::new();
        for interval in intervals {
            if let Some(milestone) = self.record_one(interval).await {
                reached.push(milestone);
            }
        }
        reached
    }

    async fn record_one(&self, interval: &MemberInterval) -> Option<Milestone> {
        let secs = interval.duration_secs();
        if secs == 0 {
            return None;
        }

        let member = interval.member_key();
        let month = interval.joined_at.month_key();

        if let Err(e) = self.stats.add_interval(&member, &month, secs).await {
            warn!(
                member_id = %interval.member,
                month = %month,
                secs,
                error = %e,
                "Failed to record member interval"
            );
            return None;
        }
        debug!(member_id = %interval.member, month = %month, secs, "Member interval recorded");

        let after = match self.stats.total_secs(&member).await {
            Ok(total) => total,
            Err(e) => {
                warn!(
                    member_id = %interval.member,
                    error = %e,
                    "Failed to read member total; milestone check skipped"
                );
                return None;
            }
        };
        let before = after - secs;

        let milestone = crossed_milestone(before, after, self.milestone_hours)?;
        info!(
            group_id = %member.group_id,
            member_id = %interval.member,
            hours = milestone.hours,
            "Milestone reached"
        );

        let announcement = Announcement::Milestone {
            member: interval.member,
            hours: milestone.hours,
            total_secs: milestone.total_secs,
        };
        if let Err(e) = self.notifier.announce(member.group_id, &announcement).await {
            warn!(group_id = %member.group_id, error = %e, "Announcement failed");
        }

        Some(milestone)
    }
}
