//! Notifier that writes prompts and announcements to the log.
//!
//! Answers to prompts are fed in through the shared [`ConfirmationBoard`],
//! e.g. from the stdin event source.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::info;

use crate::adapters::ConfirmationBoard;
use crate::domain::foundation::{format_hms, ChannelKey, DomainError, GroupId, MemberId};
use crate::domain::watchdog::ConfirmationOutcome;
use crate::domain::Announcement;
use crate::ports::{Notifier, PromptHandle};

pub struct LoggingNotifier {
    board: Arc<ConfirmationBoard>,
}

impl LoggingNotifier {
    pub fn new(board: Arc<ConfirmationBoard>) -> Self {
        Self { board }
    }
}

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_confirmation_prompt(
        &self,
        channel: &ChannelKey,
        member: MemberId,
        marker: &str,
    ) -> Result<PromptHandle, DomainError> {
        let handle = PromptHandle {
            reference: ConfirmationBoard::next_reference(),
            channel: *channel,
            member,
            marker: marker.to_string(),
        };
        info!(
            group_id = %channel.group_id,
            channel_id = %channel.channel_id,
            member_id = %member,
            reference = %handle.reference,
            "Member {} has been alone for a while; answer with {} to stay unmuted",
            member,
            marker
        );
        Ok(self.board.register(handle))
    }

    async fn await_confirmation(&self, handle: &PromptHandle, wait: Duration) -> ConfirmationOutcome {
        self.board.wait(handle, wait).await
    }

    async fn announce(&self, group: GroupId, announcement: &Announcement) -> Result<(), DomainError> {
        info!(group_id = %group, kind = announcement.kind(), "{}", render(announcement));
        Ok(())
    }
}

fn render(announcement: &Announcement) -> String {
    match announcement {
        Announcement::CallStarted {
            channel_name,
            started_by,
            ..
        } => format!("Call started in {} by {}", channel_name, started_by),
        Announcement::CallEnded {
            channel_name,
            duration_secs,
            ..
        } => format!(
            "Call ended in {} after {}",
            channel_name,
            format_hms(chrono::Duration::seconds(*duration_secs))
        ),
        Announcement::MuteCancelled { member, .. } => {
            format!("Member {} confirmed; mute cancelled", member)
        }
        Announcement::Muted { member, .. } => {
            format!("Member {} did not answer and was muted", member)
        }
        Announcement::Unmuted { member } => format!("Member {} rejoined and was unmuted", member),
        Announcement::Milestone { member, hours, .. } => {
            format!("Member {} passed {} hours in calls", member, hours)
        }
    }
}
