//! Tracks outstanding confirmation prompts for notifier adapters.
//!
//! A notifier registers each prompt it sends here; whatever transport carries
//! the member's answer calls [`ConfirmationBoard::confirm`]. Waiting is
//! bounded by the deadline the engine passes in.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::Notify;

use crate::domain::foundation::{MemberKey, PromptId};
use crate::domain::watchdog::ConfirmationOutcome;
use crate::ports::PromptHandle;

struct Entry {
    handle: PromptHandle,
    signal: Arc<Notify>,
}

#[derive(Default)]
pub struct ConfirmationBoard {
    entries: Mutex<HashMap<String, Entry>>,
}

/// Drops the prompt from the board when the wait ends, including when the
/// waiting task is aborted.
struct Withdrawal<'a> {
    board: &'a ConfirmationBoard,
    reference: &'a str,
}

impl Drop for Withdrawal<'_> {
    fn drop(&mut self) {
        self.board.entries().remove(self.reference);
    }
}

impl ConfirmationBoard {
    pub fn new() -> Self {
        Self::default()
    }

    // Never held across an await.
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Registers a sent prompt and returns its handle.
    pub fn register(&self, handle: PromptHandle) -> PromptHandle {
        self.entries().insert(
            handle.reference.clone(),
            Entry {
                handle: handle.clone(),
                signal: Arc::new(Notify::new()),
            },
        );
        handle
    }

    /// Mints a fresh reference for a prompt.
    pub fn next_reference() -> String {
        PromptId::new().to_string()
    }

    /// Delivers an answer from `member` with `marker`.
    ///
    /// Returns true if it matched an outstanding prompt. Answers from other
    /// members or with a different marker match nothing.
    pub fn confirm(&self, member: &MemberKey, marker: &str) -> bool {
        let entries = self.entries();
        let mut matched = false;
        for entry in entries.values().filter(|entry| {
            entry.handle.channel.group_id == member.group_id
                && entry.handle.member == member.member_id
                && entry.handle.marker == marker
        }) {
            // notify_one stores a permit, so an answer that arrives before
            // the engine starts waiting is not lost.
            entry.signal.notify_one();
            matched = true;
        }
        matched
    }

    /// Waits up to `wait` for an answer to `handle`, then forgets the prompt.
    pub async fn wait(&self, handle: &PromptHandle, wait: Duration) -> ConfirmationOutcome {
        let _withdrawal = Withdrawal {
            board: self,
            reference: &handle.reference,
        };
        let signal = self
            .entries()
            .get(&handle.reference)
            .map(|entry| Arc::clone(&entry.signal));

        match signal {
            Some(signal) => match tokio::time::timeout(wait, signal.notified()).await {
                Ok(()) => ConfirmationOutcome::Confirmed,
                Err(_) => ConfirmationOutcome::TimedOut,
            },
            None => {
                tokio::time::sleep(wait).await;
                ConfirmationOutcome::TimedOut
            }
        }
    }

    /// Number of prompts still awaiting an answer.
    pub fn outstanding(&self) -> usize {
        self.entries().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{ChannelKey, MemberId};

    fn handle(member: u64) -> PromptHandle {
        PromptHandle {
            reference: ConfirmationBoard::next_reference(),
            channel: ChannelKey::new(1, 10),
            member: MemberId::new(member),
            marker: "✅".to_string(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn answer_before_deadline_confirms() {
        let board = Arc::new(ConfirmationBoard::new());
        let handle = board.register(handle(7));

        let waiter = {
            let board = Arc::clone(&board);
            let handle = handle.clone();
            tokio::spawn(async move { board.wait(&handle, Duration::from_secs(300)).await })
        };

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(board.confirm(&MemberKey::new(1, 7), "✅"));

        assert_eq!(waiter.await.unwrap(), ConfirmationOutcome::Confirmed);
        assert_eq!(board.outstanding(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn answer_before_waiting_is_kept() {
        let board = ConfirmationBoard::new();
        let handle = board.register(handle(7));

        assert!(board.confirm(&MemberKey::new(1, 7), "✅"));

        let outcome = board.wait(&handle, Duration::from_secs(300)).await;
        assert_eq!(outcome, ConfirmationOutcome::Confirmed);
    }

    #[tokio::test(start_paused = true)]
    async fn wrong_member_or_marker_is_ignored() {
        let board = ConfirmationBoard::new();
        let handle = board.register(handle(7));

        assert!(!board.confirm(&MemberKey::new(1, 8), "✅"));
        assert!(!board.confirm(&MemberKey::new(1, 7), "👍"));
        assert!(!board.confirm(&MemberKey::new(2, 7), "✅"));

        let outcome = board.wait(&handle, Duration::from_secs(300)).await;
        assert_eq!(outcome, ConfirmationOutcome::TimedOut);
    }

    #[tokio::test(start_paused = true)]
    async fn aborted_wait_forgets_the_prompt() {
        let board = Arc::new(ConfirmationBoard::new());
        let handle = board.register(handle(7));

        let waiter = {
            let board = Arc::clone(&board);
            let handle = handle.clone();
            tokio::spawn(async move { board.wait(&handle, Duration::from_secs(300)).await })
        };
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(board.outstanding(), 1);

        waiter.abort();
        assert!(waiter.await.unwrap_err().is_cancelled());

        assert_eq!(board.outstanding(), 0);
        assert!(!board.confirm(&MemberKey::new(1, 7), "✅"));
    }
}
