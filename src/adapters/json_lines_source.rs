//! JSON-lines presence event source.
//!
//! Each line is either a presence event or a confirmation answer:
//!
//! ```text
//! {"type":"join","member":7,"channel":{"key":{"group_id":1,"channel_id":10},"name":"Lounge","members":[7]}}
//! {"confirm":{"group_id":1,"member_id":7},"marker":"✅"}
//! ```
//!
//! Presence events are forwarded to the coordinator in arrival order;
//! answers go straight to the confirmation board.

use std::sync::Arc;

use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::adapters::ConfirmationBoard;
use crate::domain::foundation::MemberKey;
use crate::domain::presence::PresenceEvent;
use crate::domain::watchdog::DEFAULT_CONFIRMATION_MARKER;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InputLine {
    Presence(PresenceEvent),
    Confirmation(ConfirmationLine),
}

#[derive(Debug, Deserialize)]
struct ConfirmationLine {
    confirm: MemberKey,
    #[serde(default = "default_marker")]
    marker: String,
}

fn default_marker() -> String {
    DEFAULT_CONFIRMATION_MARKER.to_string()
}

/// Counts of what a source run consumed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceSummary {
    pub events: usize,
    pub confirmations: usize,
    pub rejected: usize,
}

pub struct JsonLinesSource {
    events: mpsc::Sender<PresenceEvent>,
    board: Arc<ConfirmationBoard>,
}

impl JsonLinesSource {
    pub fn new(events: mpsc::Sender<PresenceEvent>, board: Arc<ConfirmationBoard>) -> Self {
        Self { events, board }
    }

    /// Reads `reader` to the end, or until the event receiver goes away.
    ///
    /// Malformed lines are logged and skipped.
    pub async fn run<R>(&self, reader: R) -> std::io::Result<SourceSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut summary = SourceSummary::default();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            match serde_json::from_str::<InputLine>(line) {
                Ok(InputLine::Presence(event)) => {
                    if self.events.send(event).await.is_err() {
                        debug!("Event receiver closed; stopping source");
                        break;
                    }
                    summary.events += 1;
                }
                Ok(InputLine::Confirmation(answer)) => {
                    let matched = self.board.confirm(&answer.confirm, &answer.marker);
                    debug!(
                        group_id = %answer.confirm.group_id,
                        member_id = %answer.confirm.member_id,
                        matched,
                        "Confirmation received"
                    );
                    summary.confirmations += 1;
                }
                Err(e) => {
                    warn!(error = %e, "Skipping malformed input line");
                    summary.rejected += 1;
                }
            }
        }

        Ok(summary)
    }
}
