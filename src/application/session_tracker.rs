//! SessionTracker - Folds presence events into multi-participant sessions.
//!
//! One [`Session`] exists per channel while its occupancy is at or above the
//! threshold. Leaves hand back finished member intervals; a session whose
//! channel drops below the threshold is closed and persisted.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::domain::foundation::{
    format_hms, ChannelKey, DomainError, GroupId, MemberId, Timestamp,
};
use crate::domain::presence::{ChannelSnapshot, PresenceEvent};
use crate::domain::session::{MemberInterval, Session, SessionRecord, MIN_SESSION_MEMBERS};
use crate::ports::{Clock, SessionStore};

/// What one presence change did to the tracked sessions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Finished member intervals, in the order they ended.
    pub intervals: Vec<MemberInterval>,
    /// Channels whose session opened.
    pub opened: Vec<ChannelKey>,
    /// Sessions that closed.
    pub closed: Vec<SessionRecord>,
}

impl SessionUpdate {
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty() && self.opened.is_empty() && self.closed.is_empty()
    }

    fn merge(&mut self, other: SessionUpdate) {
        self.intervals.extend(other.intervals);
        self.opened.extend(other.opened);
        self.closed.extend(other.closed);
    }
}

/// Errors from the session tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The session store rejected a closed session.
    ///
    /// The session is already gone from memory; `update` still carries
    /// everything the change produced so callers can record the intervals.
    #[error("failed to persist session: {source}")]
    PersistFailed {
        update: SessionUpdate,
        #[source]
        source: DomainError,
    },
}

impl TrackerError {
    /// The update produced before the failure.
    pub fn into_update(self) -> SessionUpdate {
        match self {
            TrackerError::PersistFailed { update, .. } => update,
        }
    }
}

/// Read-only view of an active session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub channel: ChannelKey,
    pub label: String,
    pub started_at: Timestamp,
    pub member_count: usize,
    pub participants: Vec<MemberId>,
}

pub struct SessionTracker {
    sessions: RwLock<HashMap<ChannelKey, Session>>,
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    min_members: usize,
}

impl SessionTracker {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            store,
            clock,
            min_members: MIN_SESSION_MEMBERS,
        }
    }

    /// Overrides the occupancy at which a session opens. Values below two are
    /// raised to two.
    pub fn with_min_members(mut self, min_members: usize) -> Self {
        self.min_members = min_members.max(MIN_SESSION_MEMBERS);
        self
    }

    /// Applies one presence event.
    pub async fn handle(&self, event: &PresenceEvent) -> Result<SessionUpdate, TrackerError> {
        match event {
            PresenceEvent::Join { member, channel } => self.on_join(channel, *member).await,
            PresenceEvent::Leave { member, channel } => self.on_leave(channel, *member).await,
            PresenceEvent::Move { member, from, to } => self.on_move(from, to, *member).await,
        }
    }

    /// `member` entered `channel`; `channel.members` is the roster after the
    /// change.
    pub async fn on_join(
        &self,
        channel: &ChannelSnapshot,
        member: MemberId,
    ) -> Result<SessionUpdate, TrackerError> {
        let now = self.clock.now();
        let mut update = SessionUpdate::default();
        let mut sessions = self.sessions.write().await;

        match sessions.get_mut(&channel.key) {
            Some(session) => {
                let admitted = session.admit(channel, now);
                debug!(
                    group_id = %channel.key.group_id,
                    channel_id = %channel.key.channel_id,
                    member_id = %member,
                    admitted = admitted.len(),
                    "Joined active session"
                );
            }
            None if channel.occupancy() >= self.min_members => {
                let session = Session::open(channel, now);
                info!(
                    group_id = %channel.key.group_id,
                    channel_id = %channel.key.channel_id,
                    member_id = %member,
                    members = session.current_count(),
                    "Session opened"
                );
                sessions.insert(channel.key, session);
                update.opened.push(channel.key);
            }
            None => {}
        }

        Ok(update)
    }

    /// `member` left `channel`; `channel.members` is the roster after the
    /// change.
    pub async fn on_leave(
        &self,
        channel: &ChannelSnapshot,
        member: MemberId,
    ) -> Result<SessionUpdate, TrackerError> {
        let now = self.clock.now();
        let mut update = SessionUpdate::default();

        let closed = {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.get_mut(&channel.key) else {
                return Ok(update);
            };

            if let Some(interval) = session.depart(member, now) {
                debug!(
                    group_id = %channel.key.group_id,
                    channel_id = %channel.key.channel_id,
                    member_id = %member,
                    secs = interval.duration_secs(),
                    "Member interval finished"
                );
                update.intervals.push(interval);
            }

            if channel.occupancy() < self.min_members {
                sessions.remove(&channel.key)
            } else {
                None
            }
        };

        let Some(session) = closed else {
            return Ok(update);
        };

        let (intervals, record) = session.close(now);
        update.intervals.extend(intervals);
        info!(
            group_id = %record.channel.group_id,
            channel_id = %record.channel.channel_id,
            duration = %format_hms(record.duration),
            participants = record.participants.len(),
            "Session closed"
        );

        let result = self.store.persist_session(&record).await;
        update.closed.push(record);

        match result {
            Ok(()) => Ok(update),
            Err(source) => {
                warn!(
                    group_id = %channel.key.group_id,
                    channel_id = %channel.key.channel_id,
                    error = %source,
                    "Session store rejected closed session"
                );
                Err(TrackerError::PersistFailed { update, source })
            }
        }
    }

    /// `member` moved from `from` to `to`: a leave followed by a join.
    ///
    /// A move within one channel changes nothing.
    pub async fn on_move(
        &self,
        from: &ChannelSnapshot,
        to: &ChannelSnapshot,
        member: MemberId,
    ) -> Result<SessionUpdate, TrackerError> {
        if from.key == to.key {
            return Ok(SessionUpdate::default());
        }

        let (mut update, persist_error) = match self.on_leave(from, member).await {
            Ok(update) => (update, None),
            Err(TrackerError::PersistFailed { update, source }) => (update, Some(source)),
        };

        // the join side never persists
        update.merge(self.on_join(to, member).await?);

        match persist_error {
            Some(source) => Err(TrackerError::PersistFailed { update, source }),
            None => Ok(update),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// Active sessions, oldest first.
    pub async fn active_sessions(&self) -> Vec<SessionSnapshot> {
        let sessions = self.sessions.read().await;
        let mut snapshots: Vec<SessionSnapshot> = sessions
            .values()
            .map(|s| SessionSnapshot {
                channel: *s.channel(),
                label: s.label().to_string(),
                started_at: *s.started_at(),
                member_count: s.current_count(),
                participants: s.participants().iter().copied().collect(),
            })
            .collect();
        snapshots.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.channel.cmp(&b.channel))
        });
        snapshots
    }

    /// `(label, elapsed)` for every active session in `group`, oldest first.
    pub async fn active_call_durations(&self, group: GroupId) -> Vec<(String, String)> {
        let now = self.clock.now();
        self.active_sessions()
            .await
            .into_iter()
            .filter(|s| s.channel.group_id == group)
            .map(|s| (s.label, format_hms(now.duration_since(&s.started_at))))
            .collect()
    }

    pub async fn has_active_sessions(&self) -> bool {
        !self.sessions.read().await.is_empty()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub(crate) fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }
}
