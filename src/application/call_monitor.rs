//! CallMonitor - Announces when a channel's call starts and ends.
//!
//! Independent of sessions: a call runs from the first member entering an
//! empty channel until the last one leaves, even if nobody else ever joins.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::domain::foundation::{ChannelKey, MemberId, Timestamp};
use crate::domain::presence::{ChannelSnapshot, PresenceEvent};
use crate::domain::Announcement;
use crate::ports::{Clock, Notifier};

#[derive(Debug, Clone)]
struct Call {
    label: String,
    started_at: Timestamp,
}

pub struct CallMonitor {
    calls: RwLock<HashMap<ChannelKey, Call>>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
}

impl CallMonitor {
    pub fn new(notifier: Arc<dyn Notifier>, clock: Arc<dyn Clock>) -> Self {
        Self {
            calls: RwLock::new(HashMap::new()),
            notifier,
            clock,
        }
    }

    /// Applies one presence event and returns the announcements it caused.
    pub async fn on_event(&self, event: &PresenceEvent) -> Vec<Announcement> {
        if let PresenceEvent::Move { from, to, .. } = event {
            if from.key == to.key {
                return Vec::new();
            }
        }

        let member = event.member();
        let mut announcements = Vec::new();
        for channel in event.affected_channels() {
            if let Some(announcement) = self.apply(channel, member).await {
                announcements.push(announcement);
            }
        }

        let group = event.group_id();
        for announcement in &announcements {
            if let Err(e) = self.notifier.announce(group, announcement).await {
                warn!(group_id = %group, kind = announcement.kind(), error = %e, "Announcement failed");
            }
        }

        announcements
    }

    /// Number of channels with a call in progress.
    pub async fn active_calls(&self) -> usize {
        self.calls.read().await.len()
    }

    async fn apply(&self, channel: &ChannelSnapshot, member: MemberId) -> Option<Announcement> {
        let now = self.clock.now();
        let mut calls = self.calls.write().await;

        match (channel.occupancy(), calls.contains_key(&channel.key)) {
            (0, true) => {
                let call = calls.remove(&channel.key)?;
                let duration = now.duration_since(&call.started_at);
                info!(
                    group_id = %channel.key.group_id,
                    channel_id = %channel.key.channel_id,
                    secs = duration.num_seconds(),
                    "Call ended"
                );
                let label = if channel.name.is_empty() {
                    call.label
                } else {
                    channel.name.clone()
                };
                Some(Announcement::CallEnded {
                    channel: channel.key,
                    channel_name: label,
                    duration_secs: duration.num_seconds().max(0),
                })
            }
            (n, false) if n > 0 => {
                calls.insert(
                    channel.key,
                    Call {
                        label: channel.name.clone(),
                        started_at: now,
                    },
                );
                info!(
                    group_id = %channel.key.group_id,
                    channel_id = %channel.key.channel_id,
                    member_id = %member,
                    "Call started"
                );
                Some(Announcement::CallStarted {
                    channel: channel.key,
                    channel_name: channel.name.clone(),
                    started_by: member,
                    started_at: now,
                })
            }
            _ => None,
        }
    }
}
