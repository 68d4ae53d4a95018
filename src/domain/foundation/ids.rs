//! Strongly-typed identifier value objects.
//!
//! Groups, channels and members are identified by the numeric ids handed to
//! us by the presence source. Watch and prompt ids are generated locally.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(u64);

        impl $name {
            /// Wraps a raw numeric id.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Returns the raw numeric id.
            pub const fn get(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }
    };
}

numeric_id!(
    /// Identifier of the parent group (server) a channel belongs to.
    GroupId
);

numeric_id!(
    /// Identifier of a real-time channel within a group.
    ChannelId
);

numeric_id!(
    /// Identifier of a member.
    MemberId
);

/// A channel scoped to its parent group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChannelKey {
    pub group_id: GroupId,
    pub channel_id: ChannelId,
}

impl ChannelKey {
    pub fn new(group_id: impl Into<GroupId>, channel_id: impl Into<ChannelId>) -> Self {
        Self {
            group_id: group_id.into(),
            channel_id: channel_id.into(),
        }
    }

    /// The key of `member` within this channel's group.
    pub fn member(&self, member_id: MemberId) -> MemberKey {
        MemberKey::new(self.group_id, member_id)
    }
}

impl fmt::Display for ChannelKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.channel_id)
    }
}

/// A member scoped to a group. Mutes and prompts are tracked per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberKey {
    pub group_id: GroupId,
    pub member_id: MemberId,
}

impl MemberKey {
    pub fn new(group_id: impl Into<GroupId>, member_id: impl Into<MemberId>) -> Self {
        Self {
            group_id: group_id.into(),
            member_id: member_id.into(),
        }
    }
}

impl fmt::Display for MemberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.group_id, self.member_id)
    }
}

/// Unique identifier for one armed idle watch.
///
/// A fresh id is minted every time a watch is armed, so a timer that outlives
/// its watch can tell it has been superseded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WatchId(Uuid);

impl WatchId {
    /// Creates a new random WatchId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for WatchId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for WatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptId(Uuid);

impl PromptId {
    /// Creates a new random PromptId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PromptId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PromptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PromptId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_parse_and_display() {
        let id: MemberId = "123456789012345678".parse().unwrap();
        assert_eq!(id.get(), 123456789012345678);
        assert_eq!(id.to_string(), "123456789012345678");
    }

    #[test]
    fn numeric_id_rejects_garbage() {
        assert!("not-a-number".parse::<GroupId>().is_err());
    }

    #[test]
    fn channel_key_displays_group_then_channel() {
        let key = ChannelKey::new(1, 2);
        assert_eq!(key.to_string(), "1/2");
    }

    #[test]
    fn channel_key_scopes_member_to_group() {
        let key = ChannelKey::new(7, 2);
        assert_eq!(key.member(MemberId::new(9)), MemberKey::new(7, 9));
    }

    #[test]
    fn numeric_ids_serialize_transparently() {
        let json = serde_json::to_string(&ChannelId::new(42)).unwrap();
        assert_eq!(json, "42");
    }

    #[test]
    fn watch_ids_are_unique() {
        assert_ne!(WatchId::new(), WatchId::new());
    }

    #[test]
    fn prompt_id_roundtrips_through_string() {
        let id = PromptId::new();
        let parsed: PromptId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
