//! Idle watch entity - a channel believed to hold exactly one member.

use crate::domain::foundation::{
    ChannelKey, MemberId, MemberKey, PromptId, StateMachine, Timestamp, ValidationError, WatchId,
};

use super::WatchState;

/// A channel currently being watched for a solitary occupant.
///
/// The watch id changes every time a watch is armed. Timer callbacks carry
/// the id they were armed with and must find it still current before acting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdleWatch {
    id: WatchId,
    channel: ChannelKey,
    member: MemberId,
    started_at: Timestamp,
    state: WatchState,
    prompt: Option<PromptId>,
}

impl IdleWatch {
    /// Arms a new watch for `member`, alone in `channel` since `started_at`.
    pub fn arm(channel: ChannelKey, member: MemberId, started_at: Timestamp) -> Self {
        Self {
            id: WatchId::new(),
            channel,
            member,
            started_at,
            state: WatchState::Lonely,
            prompt: None,
        }
    }

    pub fn id(&self) -> WatchId {
        self.id
    }

    pub fn channel(&self) -> &ChannelKey {
        &self.channel
    }

    pub fn member(&self) -> MemberId {
        self.member
    }

    pub fn member_key(&self) -> MemberKey {
        self.channel.member(self.member)
    }

    pub fn started_at(&self) -> &Timestamp {
        &self.started_at
    }

    pub fn state(&self) -> WatchState {
        self.state
    }

    pub fn prompt(&self) -> Option<PromptId> {
        self.prompt
    }

    /// True if `id` still identifies this watch and it is watching `member`.
    pub fn is_current(&self, id: WatchId, member: MemberId) -> bool {
        self.id == id && self.member == member
    }

    /// The timer fired with the member still alone: a prompt goes out.
    pub fn await_confirmation(&mut self, prompt: PromptId) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(WatchState::AwaitingConfirmation)?;
        self.prompt = Some(prompt);
        Ok(())
    }

    /// The member confirmed they are present.
    pub fn confirm(&mut self) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(WatchState::Normal)?;
        self.prompt = None;
        Ok(())
    }

    /// The deadline elapsed without confirmation.
    pub fn expire(&mut self) -> Result<(), ValidationError> {
        self.state = self.state.transition_to(WatchState::Muted)?;
        self.prompt = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch() -> IdleWatch {
        IdleWatch::arm(ChannelKey::new(1, 2), MemberId::new(3), Timestamp::from_unix_secs(0))
    }

    #[test]
    fn arm_starts_lonely_without_prompt() {
        let w = watch();
        assert_eq!(w.state(), WatchState::Lonely);
        assert!(w.prompt().is_none());
        assert_eq!(w.member_key(), MemberKey::new(1, 3));
    }

    #[test]
    fn rearming_mints_a_new_id() {
        assert_ne!(watch().id(), watch().id());
    }

    #[test]
    fn is_current_requires_same_id_and_member() {
        let w = watch();
        assert!(w.is_current(w.id(), MemberId::new(3)));
        assert!(!w.is_current(WatchId::new(), MemberId::new(3)));
        assert!(!w.is_current(w.id(), MemberId::new(4)));
    }

    #[test]
    fn confirmation_cycle() {
        let mut w = watch();
        let prompt = PromptId::new();
        w.await_confirmation(prompt).unwrap();
        assert_eq!(w.prompt(), Some(prompt));

        w.confirm().unwrap();
        assert_eq!(w.state(), WatchState::Normal);
        assert!(w.prompt().is_none());
    }

    #[test]
    fn expiry_moves_to_muted() {
        let mut w = watch();
        w.await_confirmation(PromptId::new()).unwrap();
        w.expire().unwrap();
        assert_eq!(w.state(), WatchState::Muted);
    }

    #[test]
    fn cannot_expire_before_prompt() {
        let mut w = watch();
        assert!(w.expire().is_err());
        assert_eq!(w.state(), WatchState::Lonely);
    }

    #[test]
    fn cannot_prompt_twice() {
        let mut w = watch();
        w.await_confirmation(PromptId::new()).unwrap();
        assert!(w.await_confirmation(PromptId::new()).is_err());
    }
}
