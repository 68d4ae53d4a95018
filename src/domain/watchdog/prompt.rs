//! Confirmation prompt entity.
//!
//! Sent to a member who has been alone in a channel for too long. The member
//! either answers with the expected marker before the deadline or gets muted.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ChannelKey, MemberKey, PromptId, Timestamp, ValidationError, WatchId,
};

/// Default marker the member reacts with to prove they are awake.
pub const DEFAULT_CONFIRMATION_MARKER: &str = "✅";

/// Status of a confirmation prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptStatus {
    /// Waiting for the member
    Pending,
    /// Member answered in time
    Confirmed,
    /// Deadline elapsed
    Expired,
    /// The owning watch was cancelled before an answer came in
    Withdrawn,
}

impl PromptStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

/// How waiting on a prompt ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfirmationOutcome {
    Confirmed,
    TimedOut,
}

/// An outstanding request for a solitary member to signal presence.
///
/// # Invariants
///
/// - at most one pending prompt per member (enforced by the watchdog)
/// - a prompt resolves exactly once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationPrompt {
    id: PromptId,
    watch: WatchId,
    member: MemberKey,
    channel: ChannelKey,
    marker: String,
    sent_at: Timestamp,
    deadline: Timestamp,
    status: PromptStatus,
}

impl ConfirmationPrompt {
    pub fn new(
        watch: WatchId,
        member: MemberKey,
        channel: ChannelKey,
        marker: impl Into<String>,
        sent_at: Timestamp,
        deadline: Timestamp,
    ) -> Self {
        Self {
            id: PromptId::new(),
            watch,
            member,
            channel,
            marker: marker.into(),
            sent_at,
            deadline,
            status: PromptStatus::Pending,
        }
    }

    pub fn id(&self) -> PromptId {
        self.id
    }

    pub fn watch(&self) -> WatchId {
        self.watch
    }

    pub fn member(&self) -> &MemberKey {
        &self.member
    }

    pub fn channel(&self) -> &ChannelKey {
        &self.channel
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn sent_at(&self) -> &Timestamp {
        &self.sent_at
    }

    pub fn deadline(&self) -> &Timestamp {
        &self.deadline
    }

    pub fn status(&self) -> PromptStatus {
        self.status
    }

    /// Records how the prompt ended.
    ///
    /// # Errors
    ///
    /// Fails if the prompt was already resolved; callers treat that as "someone
    /// else got here first" and skip their effect.
    pub fn resolve(&mut self, outcome: ConfirmationOutcome) -> Result<(), ValidationError> {
        self.ensure_pending()?;
        self.status = match outcome {
            ConfirmationOutcome::Confirmed => PromptStatus::Confirmed,
            ConfirmationOutcome::TimedOut => PromptStatus::Expired,
        };
        Ok(())
    }

    /// Marks the prompt as withdrawn because its watch was cancelled.
    pub fn withdraw(&mut self) -> Result<(), ValidationError> {
        self.ensure_pending()?;
        self.status = PromptStatus::Withdrawn;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), ValidationError> {
        if self.status.is_pending() {
            Ok(())
        } else {
            Err(ValidationError::invalid_format(
                "prompt_status",
                format!("prompt {} already {:?}", self.id, self.status),
            ))
        }
    }
}
