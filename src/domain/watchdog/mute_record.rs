//! Members the watchdog itself has silenced.

use std::collections::HashSet;

use crate::domain::foundation::MemberKey;

/// The set of members we muted and therefore owe an unmute.
///
/// Membership here is the only thing that decides whether a rejoin triggers
/// an unmute; members muted by anyone else are never touched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MuteRecord {
    members: HashSet<MemberKey>,
}

impl MuteRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful mute. Returns false if already recorded.
    pub fn record(&mut self, member: MemberKey) -> bool {
        self.members.insert(member)
    }

    /// Clears a member after a successful unmute. Returns false if absent.
    pub fn release(&mut self, member: &MemberKey) -> bool {
        self.members.remove(member)
    }

    pub fn owes_unmute(&self, member: &MemberKey) -> bool {
        self.members.contains(member)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberKey> {
        self.members.iter()
    }
}
