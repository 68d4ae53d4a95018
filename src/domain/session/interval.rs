//! Finished presence spans emitted by the session tracker.

use chrono::Duration;

use crate::domain::foundation::{ChannelKey, MemberId, MemberKey, Timestamp};

/// One member's continuous presence span within a session.
///
/// This is the ledger entry that per-member statistics are built from. A
/// member who leaves and rejoins within one session produces several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInterval {
    pub member: MemberId,
    pub channel: ChannelKey,
    pub joined_at: Timestamp,
    pub duration: Duration,
}

impl MemberInterval {
    /// The member scoped to the group the interval happened in.
    pub fn member_key(&self) -> MemberKey {
        self.channel.member(self.member)
    }

    /// Duration in whole seconds, never negative.
    pub fn duration_secs(&self) -> i64 {
        self.duration.num_seconds().max(0)
    }
}

/// A finished multi-participant session, ready for the session store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub channel: ChannelKey,
    pub started_at: Timestamp,
    pub duration: Duration,
    /// Every member that was ever part of the session, in ascending id order.
    pub participants: Vec<MemberId>,
}

impl SessionRecord {
    /// Duration in whole seconds, never negative.
    pub fn duration_secs(&self) -> i64 {
        self.duration.num_seconds().max(0)
    }

    /// Calendar month the session started in (`YYYY-MM`).
    pub fn month_key(&self) -> String {
        self.started_at.month_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_member_key_uses_channel_group() {
        let interval = MemberInterval {
            member: MemberId::new(3),
            channel: ChannelKey::new(10, 20),
            joined_at: Timestamp::from_unix_secs(0),
            duration: Duration::seconds(60),
        };
        assert_eq!(interval.member_key(), MemberKey::new(10, 3));
        assert_eq!(interval.duration_secs(), 60);
    }

    #[test]
    fn record_month_key_follows_start() {
        let record = SessionRecord {
            channel: ChannelKey::new(1, 1),
            started_at: Timestamp::from_unix_secs(1705276800),
            duration: Duration::hours(2),
            participants: vec![],
        };
        assert_eq!(record.month_key(), "2024-01");
        assert_eq!(record.duration_secs(), 7200);
    }
}
