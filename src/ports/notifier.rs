//! Notifier port - one-shot messages and confirmation prompts.
//!
//! The engine never depends on how a confirmation arrives (reaction, button,
//! reply). It asks the notifier to send a prompt and then to wait, bounded by
//! a deadline, for the expected marker from the expected member.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::foundation::{ChannelKey, DomainError, GroupId, MemberId};
use crate::domain::watchdog::ConfirmationOutcome;
use crate::domain::Announcement;

/// Reference to a delivered prompt, as understood by the adapter that sent it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PromptHandle {
    /// Adapter-specific message reference.
    pub reference: String,
    /// Channel the member was alone in.
    pub channel: ChannelKey,
    /// Member expected to answer.
    pub member: MemberId,
    /// Marker the member must answer with.
    pub marker: String,
}

/// Port for outbound messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Ask `member`, alone in `channel`, to answer with `marker`.
    ///
    /// # Errors
    ///
    /// - `NotificationFailed` if the prompt could not be delivered
    async fn send_confirmation_prompt(
        &self,
        channel: &ChannelKey,
        member: MemberId,
        marker: &str,
    ) -> Result<PromptHandle, DomainError>;

    /// Wait up to `wait` for the prompted member to answer.
    ///
    /// Answers from anyone else, or with any other marker, are ignored.
    async fn await_confirmation(&self, handle: &PromptHandle, wait: Duration) -> ConfirmationOutcome;

    /// Deliver an announcement to the group's notification destination.
    async fn announce(&self, group: GroupId, announcement: &Announcement) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[allow(dead_code)]
    fn assert_object_safe(_: &dyn Notifier) {}

    #[test]
    fn prompt_handle_is_cloneable() {
        let handle = PromptHandle {
            reference: "msg-1".to_string(),
            channel: ChannelKey::new(1, 2),
            member: MemberId::new(3),
            marker: "✅".to_string(),
        };
        assert_eq!(handle.clone(), handle);
    }
}
