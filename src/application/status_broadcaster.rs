//! StatusBroadcaster - Periodically publishes the "active session" status.
//!
//! Holds no state of its own beyond the running task: every tick re-derives
//! the status from the session tracker. The loop stops itself, clearing the
//! status, once no session is left.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::domain::foundation::format_hms;
use crate::ports::StatusPublisher;

use super::SessionTracker;

/// Default interval between status updates.
pub const DEFAULT_STATUS_INTERVAL: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
pub struct BroadcasterConfig {
    /// Time between ticks.
    pub interval: Duration,
}

impl Default for BroadcasterConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_STATUS_INTERVAL,
        }
    }
}

impl BroadcasterConfig {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }
}

pub struct StatusBroadcaster {
    tracker: Arc<SessionTracker>,
    publisher: Arc<dyn StatusPublisher>,
    config: BroadcasterConfig,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl StatusBroadcaster {
    pub fn new(
        tracker: Arc<SessionTracker>,
        publisher: Arc<dyn StatusPublisher>,
        config: BroadcasterConfig,
    ) -> Self {
        Self {
            tracker,
            publisher,
            config,
            task: Mutex::new(None),
        }
    }

    /// Starts the tick loop unless it is already running.
    pub fn ensure_running(self: &Arc<Self>) {
        let mut task = self.task.lock().unwrap_or_else(|e| e.into_inner());
        if task.as_ref().is_some_and(|t| !t.is_finished()) {
            return;
        }

        let this = Arc::clone(self);
        *task = Some(tokio::spawn(async move { this.run().await }));
        debug!("Status broadcaster started");
    }

    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|t| !t.is_finished())
    }

    /// Stops the loop, if running, and clears the status.
    pub async fn stop(&self) {
        let task = self.task.lock().unwrap_or_else(|e| e.into_inner()).take();
        if let Some(task) = task {
            task.abort();
            debug!("Status broadcaster stopped");
        }
        self.publish(None).await;
    }

    /// Publishes the status once. Returns false when there is no session,
    /// after clearing the status.
    pub async fn tick(&self) -> bool {
        let sessions = self.tracker.active_sessions().await;

        let Some(session) = sessions.first() else {
            self.publish(None).await;
            return false;
        };

        let elapsed = self.tracker.clock().now().duration_since(&session.started_at);
        let status = format!("{}: {}", session.label, format_hms(elapsed));
        self.publish(Some(&status)).await;
        true
    }

    async fn run(&self) {
        let mut interval = tokio::time::interval(self.config.interval);
        loop {
            interval.tick().await;
            if !self.tick().await {
                debug!("No active sessions; status broadcaster exiting");
                break;
            }
        }
    }

    async fn publish(&self, status: Option<&str>) {
        if let Err(e) = self.publisher.publish(status).await {
            warn!(error = %e, "Failed to publish status");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemorySessionStore, InMemoryStatusPublisher};
    use crate::adapters::TokioClock;
    use crate::domain::foundation::{ChannelKey, MemberId};
    use crate::domain::presence::ChannelSnapshot;

    struct Fixture {
        tracker: Arc<SessionTracker>,
        publisher: Arc<InMemoryStatusPublisher>,
        broadcaster: Arc<StatusBroadcaster>,
    }

    fn fixture() -> Fixture {
        let tracker = Arc::new(SessionTracker::new(
            Arc::new(InMemorySessionStore::new()),
            Arc::new(TokioClock::new()),
        ));
        let publisher = Arc::new(InMemoryStatusPublisher::new());
        let broadcaster = Arc::new(StatusBroadcaster::new(
            tracker.clone(),
            publisher.clone(),
            BroadcasterConfig::default(),
        ));
        Fixture {
            tracker,
            publisher,
            broadcaster,
        }
    }

    fn lounge(members: &[u64]) -> ChannelSnapshot {
        ChannelSnapshot::new(
            ChannelKey::new(1, 10),
            "Lounge",
            members.iter().copied().map(MemberId::new).collect(),
        )
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn tick_without_sessions_clears_status() {
        let f = fixture();

        assert!(!f.broadcaster.tick().await);
        assert_eq!(f.publisher.history().await, vec![None]);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn publishes_label_and_elapsed_time() {
        let f = fixture();
        f.tracker.on_join(&lounge(&[1, 2]), MemberId::new(2)).await.unwrap();

        f.broadcaster.ensure_running();
        tokio::time::sleep(Duration::from_secs(31)).await;

        let history = f.publisher.history().await;
        assert_eq!(
            history,
            vec![
                Some("Lounge: 00:00:00".to_string()),
                Some("Lounge: 00:00:15".to_string()),
                Some("Lounge: 00:00:30".to_string()),
            ]
        );
        assert!(f.broadcaster.is_running());
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn loop_exits_after_last_session_closes() {
        let f = fixture();
        f.tracker.on_join(&lounge(&[1, 2]), MemberId::new(2)).await.unwrap();
        f.broadcaster.ensure_running();
        tokio::time::sleep(Duration::from_secs(1)).await;

        f.tracker.on_leave(&lounge(&[1]), MemberId::new(2)).await.unwrap();
        tokio::time::sleep(Duration::from_secs(16)).await;

        assert!(!f.broadcaster.is_running());
        assert_eq!(f.publisher.current().await, None);
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn ensure_running_is_idempotent_and_restartable() {
        let f = fixture();
        f.tracker.on_join(&lounge(&[1, 2]), MemberId::new(2)).await.unwrap();

        f.broadcaster.ensure_running();
        f.broadcaster.ensure_running();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(f.publisher.history().await.len(), 1);

        f.broadcaster.stop().await;
        assert!(!f.broadcaster.is_running());
        assert_eq!(f.publisher.current().await, None);

        f.broadcaster.ensure_running();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(f.publisher.current().await.is_some());
    }
}
