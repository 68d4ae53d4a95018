//! Outcomes worth telling a group about.
//!
//! The engine decides *that* something should be announced; rendering and
//! delivery belong to the notifier adapter.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelKey, MemberId, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Announcement {
    /// First member entered an empty channel.
    CallStarted {
        channel: ChannelKey,
        channel_name: String,
        started_by: MemberId,
        started_at: Timestamp,
    },

    /// Last member left the channel.
    CallEnded {
        channel: ChannelKey,
        channel_name: String,
        duration_secs: i64,
    },

    /// The prompted member answered in time; no mute.
    MuteCancelled { channel: ChannelKey, member: MemberId },

    /// The prompted member never answered and was muted.
    Muted { channel: ChannelKey, member: MemberId },

    /// A member we muted came back and was unmuted.
    Unmuted { member: MemberId },

    /// A member's cumulative call time crossed a milestone.
    Milestone {
        member: MemberId,
        hours: i64,
        total_secs: i64,
    },
}

impl Announcement {
    /// Short machine-friendly name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Announcement::CallStarted { .. } => "call_started",
            Announcement::CallEnded { .. } => "call_ended",
            Announcement::MuteCancelled { .. } => "mute_cancelled",
            Announcement::Muted { .. } => "muted",
            Announcement::Unmuted { .. } => "unmuted",
            Announcement::Milestone { .. } => "milestone",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Announcement::Unmuted {
            member: MemberId::new(4),
        })
        .unwrap();
        assert_eq!(json["kind"], "unmuted");
        assert_eq!(json["member"], 4);
    }

    #[test]
    fn kind_matches_serde_tag() {
        let a = Announcement::Muted {
            channel: ChannelKey::new(1, 2),
            member: MemberId::new(3),
        };
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["kind"], a.kind());
    }
}
