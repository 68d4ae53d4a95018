//! In-memory notifier.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::adapters::ConfirmationBoard;
use crate::domain::foundation::{ChannelKey, DomainError, ErrorCode, GroupId, MemberId, MemberKey};
use crate::domain::watchdog::ConfirmationOutcome;
use crate::domain::Announcement;
use crate::ports::{Notifier, PromptHandle};

/// Records every prompt and announcement instead of delivering them.
///
/// Tests answer prompts with [`InMemoryNotifier::confirm`].
#[derive(Default)]
pub struct InMemoryNotifier {
    board: ConfirmationBoard,
    prompts: RwLock<Vec<PromptHandle>>,
    announcements: RwLock<Vec<(GroupId, Announcement)>>,
    fail_prompts: AtomicBool,
}

impl InMemoryNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent prompt deliveries fail (or succeed again).
    pub fn set_failing_prompts(&self, failing: bool) {
        self.fail_prompts.store(failing, Ordering::SeqCst);
    }

    /// Answers an outstanding prompt as `member` would.
    pub fn confirm(&self, member: &MemberKey, marker: &str) -> bool {
        self.board.confirm(member, marker)
    }

    /// Prompts still registered for an answer.
    pub fn outstanding_prompts(&self) -> usize {
        self.board.outstanding()
    }

    // === Test Helpers ===

    /// Every prompt sent so far.
    pub async fn prompts(&self) -> Vec<PromptHandle> {
        self.prompts.read().await.clone()
    }

    pub async fn prompts_for(&self, member: MemberId) -> usize {
        self.prompts
            .read()
            .await
            .iter()
            .filter(|p| p.member == member)
            .count()
    }

    /// Every announcement sent so far.
    pub async fn announcements(&self) -> Vec<(GroupId, Announcement)> {
        self.announcements.read().await.clone()
    }

    /// Announcements of one kind (see [`Announcement::kind`]).
    pub async fn announcements_of_kind(&self, kind: &str) -> Vec<Announcement> {
        self.announcements
            .read()
            .await
            .iter()
            .filter(|(_, a)| a.kind() == kind)
            .map(|(_, a)| a.clone())
            .collect()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn send_confirmation_prompt(
        &self,
        channel: &ChannelKey,
        member: MemberId,
        marker: &str,
    ) -> Result<PromptHandle, DomainError> {
        if self.fail_prompts.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::NotificationFailed,
                format!("Prompt to member {} in {} was not delivered", member, channel),
            ));
        }

        let handle = PromptHandle {
            reference: ConfirmationBoard::next_reference(),
            channel: *channel,
            member,
            marker: marker.to_string(),
        };
        self.prompts.write().await.push(handle.clone());
        Ok(self.board.register(handle))
    }

    async fn await_confirmation(&self, handle: &PromptHandle, wait: Duration) -> ConfirmationOutcome {
        self.board.wait(handle, wait).await
    }

    async fn announce(&self, group: GroupId, announcement: &Announcement) -> Result<(), DomainError> {
        self.announcements
            .write()
            .await
            .push((group, announcement.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn records_prompts_and_times_out_without_answer() {
        let notifier = InMemoryNotifier::new();
        let handle = notifier
            .send_confirmation_prompt(&ChannelKey::new(1, 2), MemberId::new(3), "✅")
            .await
            .unwrap();

        let outcome = notifier
            .await_confirmation(&handle, Duration::from_secs(60))
            .await;

        assert_eq!(outcome, ConfirmationOutcome::TimedOut);
        assert_eq!(notifier.prompts_for(MemberId::new(3)).await, 1);
    }

    #[tokio::test]
    async fn failing_prompts_return_notification_failed() {
        let notifier = InMemoryNotifier::new();
        notifier.set_failing_prompts(true);

        let err = notifier
            .send_confirmation_prompt(&ChannelKey::new(1, 2), MemberId::new(3), "✅")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::NotificationFailed);
        assert!(notifier.prompts().await.is_empty());
    }

    #[tokio::test]
    async fn announcements_are_filterable_by_kind() {
        let notifier = InMemoryNotifier::new();
        notifier
            .announce(
                GroupId::new(1),
                &Announcement::Unmuted {
                    member: MemberId::new(3),
                },
            )
            .await
            .unwrap();

        assert_eq!(notifier.announcements_of_kind("unmuted").await.len(), 1);
        assert!(notifier.announcements_of_kind("muted").await.is_empty());
    }
}
