//! Session aggregate.
//!
//! A session is one contiguous interval during which a channel held at least
//! [`MIN_SESSION_MEMBERS`] occupants. It is owned exclusively by the session
//! tracker.

use std::collections::{BTreeSet, HashMap};

use crate::domain::foundation::{ChannelKey, MemberId, Timestamp};
use crate::domain::presence::ChannelSnapshot;

use super::{MemberInterval, SessionRecord};

/// Default occupancy at which a channel counts as a multi-participant session.
pub const MIN_SESSION_MEMBERS: usize = 2;

/// Multi-participant session aggregate.
///
/// # Invariants
///
/// - `all_participants` is a superset of the keys of `current_members`
/// - `all_participants` never shrinks
/// - every join time in `current_members` is at or after `started_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Channel the session lives in.
    channel: ChannelKey,

    /// Latest known channel label.
    label: String,

    /// When the threshold was first crossed.
    started_at: Timestamp,

    /// Member -> join time within this session.
    current_members: HashMap<MemberId, Timestamp>,

    /// Every member ever part of this session.
    all_participants: BTreeSet<MemberId>,
}

impl Session {
    /// Opens a session with every occupant of `channel` joined at `now`.
    pub fn open(channel: &ChannelSnapshot, now: Timestamp) -> Self {
        let mut session = Self {
            channel: channel.key,
            label: channel.name.clone(),
            started_at: now,
            current_members: HashMap::new(),
            all_participants: BTreeSet::new(),
        };
        session.admit(channel, now);
        session
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn channel(&self) -> &ChannelKey {
        &self.channel
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    /// Join time of `member`, if currently in the session.
    pub fn joined_at(&self, member: MemberId) -> Option<&Timestamp> {
        self.current_members.get(&member)
    }

    pub fn is_present(&self, member: MemberId) -> bool {
        self.current_members.contains_key(&member)
    }

    pub fn current_count(&self) -> usize {
        self.current_members.len()
    }

    pub fn participants(&self) -> &BTreeSet<MemberId> {
        &self.all_participants
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Folds the roster into the session: occupants not yet tracked join at
    /// `now`. Returns the newly admitted members.
    pub fn admit(&mut self, channel: &ChannelSnapshot, now: Timestamp) -> Vec<MemberId> {
        if !channel.name.is_empty() {
            self.label.clone_from(&channel.name);
        }

        let mut admitted = Vec::new();
        for member in &channel.members {
            if !self.current_members.contains_key(member) {
                self.current_members.insert(*member, now);
                admitted.push(*member);
            }
            self.all_participants.insert(*member);
        }
        admitted
    }

    /// Removes `member` and returns their finished interval, or `None` if they
    /// were not in the session.
    pub fn depart(&mut self, member: MemberId, now: Timestamp) -> Option<MemberInterval> {
        let joined_at = self.current_members.remove(&member)?;
        Some(MemberInterval {
            member,
            channel: self.channel,
            joined_at,
            duration: now.duration_since(&joined_at),
        })
    }

    /// Ends the session: closes every remaining member's interval and
    /// produces the record to persist.
    ///
    /// Intervals are returned in ascending member order so callers see a
    /// stable sequence.
    pub fn close(mut self, now: Timestamp) -> (Vec<MemberInterval>, SessionRecord) {
        let mut remaining: Vec<MemberId> = self.current_members.keys().copied().collect();
        remaining.sort();

        let intervals = remaining
            .into_iter()
            .filter_map(|member| self.depart(member, now))
            .collect();

        let record = SessionRecord {
            channel: self.channel,
            started_at: self.started_at,
            duration: now.duration_since(&self.started_at),
            participants: self.all_participants.into_iter().collect(),
        };

        (intervals, record)
    }
}
