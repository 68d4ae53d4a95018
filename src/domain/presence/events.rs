//! Presence change events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelKey, GroupId, MemberId};

/// A channel and its current roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSnapshot {
    /// Channel identity.
    pub key: ChannelKey,

    /// Human-readable channel label, used for status text and announcements.
    #[serde(default)]
    pub name: String,

    /// Members present in the channel after the change.
    #[serde(default)]
    pub members: Vec<MemberId>,
}

impl ChannelSnapshot {
    pub fn new(key: ChannelKey, name: impl Into<String>, members: Vec<MemberId>) -> Self {
        Self {
            key,
            name: name.into(),
            members,
        }
    }

    /// Number of occupants.
    pub fn occupancy(&self) -> usize {
        self.members.len()
    }

    /// The single occupant, if the channel holds exactly one member.
    pub fn sole_member(&self) -> Option<MemberId> {
        match self.members.as_slice() {
            [only] => Some(*only),
            _ => None,
        }
    }

    /// Returns true if `member` is in the roster.
    pub fn contains(&self, member: MemberId) -> bool {
        self.members.contains(&member)
    }
}

/// One presence change, as delivered by the event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PresenceEvent {
    /// `member` entered `channel`.
    Join {
        member: MemberId,
        channel: ChannelSnapshot,
    },

    /// `member` left `channel`.
    Leave {
        member: MemberId,
        channel: ChannelSnapshot,
    },

    /// `member` moved from one channel to another within the same group.
    Move {
        member: MemberId,
        from: ChannelSnapshot,
        to: ChannelSnapshot,
    },
}

impl PresenceEvent {
    /// The member whose presence changed.
    pub fn member(&self) -> MemberId {
        match self {
            PresenceEvent::Join { member, .. }
            | PresenceEvent::Leave { member, .. }
            | PresenceEvent::Move { member, .. } => *member,
        }
    }

    /// The group the event belongs to.
    pub fn group_id(&self) -> GroupId {
        match self {
            PresenceEvent::Join { channel, .. } | PresenceEvent::Leave { channel, .. } => {
                channel.key.group_id
            }
            PresenceEvent::Move { to, .. } => to.key.group_id,
        }
    }

    /// Channels whose roster changed, in the order they must be applied
    /// (the channel left before the channel entered).
    pub fn affected_channels(&self) -> Vec<&ChannelSnapshot> {
        match self {
            PresenceEvent::Join { channel, .. } | PresenceEvent::Leave { channel, .. } => {
                vec![channel]
            }
            PresenceEvent::Move { from, to, .. } => vec![from, to],
        }
    }

    /// True when the member entered a channel (join, or arrival side of a move).
    pub fn is_arrival(&self) -> bool {
        match self {
            PresenceEvent::Join { .. } => true,
            PresenceEvent::Leave { .. } => false,
            PresenceEvent::Move { from, to, .. } => from.key != to.key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(channel: u64, members: &[u64]) -> ChannelSnapshot {
        ChannelSnapshot::new(
            ChannelKey::new(1, channel),
            format!("ch-{}", channel),
            members.iter().copied().map(MemberId::new).collect(),
        )
    }

    #[test]
    fn sole_member_only_for_single_occupant() {
        assert_eq!(snapshot(1, &[]).sole_member(), None);
        assert_eq!(snapshot(1, &[5]).sole_member(), Some(MemberId::new(5)));
        assert_eq!(snapshot(1, &[5, 6]).sole_member(), None);
    }

    #[test]
    fn move_lists_source_before_destination() {
        let event = PresenceEvent::Move {
            member: MemberId::new(5),
            from: snapshot(1, &[]),
            to: snapshot(2, &[5]),
        };
        let channels = event.affected_channels();
        assert_eq!(channels[0].key.channel_id.get(), 1);
        assert_eq!(channels[1].key.channel_id.get(), 2);
        assert!(event.is_arrival());
    }

    #[test]
    fn move_within_same_channel_is_not_an_arrival() {
        let event = PresenceEvent::Move {
            member: MemberId::new(5),
            from: snapshot(1, &[5]),
            to: snapshot(1, &[5]),
        };
        assert!(!event.is_arrival());
    }

    #[test]
    fn deserializes_tagged_json() {
        let json = r#"{
            "type": "join",
            "member": 7,
            "channel": {
                "key": { "group_id": 1, "channel_id": 2 },
                "name": "lounge",
                "members": [7, 8]
            }
        }"#;
        let event: PresenceEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.member(), MemberId::new(7));
        assert_eq!(event.group_id().get(), 1);
        assert_eq!(event.affected_channels()[0].occupancy(), 2);
    }
}
