//! PresenceCoordinator - Routes presence events through the engine.
//!
//! Every event goes to the idle watchdog first, then to the session tracker;
//! the tracker's output feeds the stats ledger, and call announcements and
//! the status broadcaster follow. Events are applied one at a time, in
//! arrival order.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info};

use crate::domain::presence::PresenceEvent;
use crate::domain::session::MIN_SESSION_MEMBERS;
use crate::domain::stats::DEFAULT_MILESTONE_HOURS;
use crate::ports::{
    Clock, GroupSettingsRepository, MemberStatsRepository, MuteActuator, Notifier, SessionStore,
    StatusPublisher,
};

use super::{
    BroadcasterConfig, CallMonitor, IdleWatchdog, SessionTracker, SessionUpdate, StatsRecorder,
    StatusBroadcaster, TrackerError, WatchdogConfig, WatchdogPorts, DEFAULT_STATUS_INTERVAL,
};

/// Every external collaborator the engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub session_store: Arc<dyn SessionStore>,
    pub notifier: Arc<dyn Notifier>,
    pub actuator: Arc<dyn MuteActuator>,
    pub group_settings: Arc<dyn GroupSettingsRepository>,
    pub member_stats: Arc<dyn MemberStatsRepository>,
    pub status: Arc<dyn StatusPublisher>,
    pub clock: Arc<dyn Clock>,
}

/// Engine tuning, usually built from the application configuration.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub watchdog: WatchdogConfig,
    pub min_session_members: usize,
    pub status_interval: Duration,
    pub milestone_hours: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            watchdog: WatchdogConfig::default(),
            min_session_members: MIN_SESSION_MEMBERS,
            status_interval: DEFAULT_STATUS_INTERVAL,
            milestone_hours: DEFAULT_MILESTONE_HOURS,
        }
    }
}

pub struct PresenceCoordinator {
    watchdog: IdleWatchdog,
    tracker: Arc<SessionTracker>,
    broadcaster: Arc<StatusBroadcaster>,
    calls: CallMonitor,
    stats: StatsRecorder,
}

impl PresenceCoordinator {
    pub fn new(collaborators: Collaborators, config: EngineConfig) -> Self {
        let Collaborators {
            session_store,
            notifier,
            actuator,
            group_settings,
            member_stats,
            status,
            clock,
        } = collaborators;

        let tracker = Arc::new(
            SessionTracker::new(session_store, clock.clone())
                .with_min_members(config.min_session_members),
        );
        let broadcaster = Arc::new(StatusBroadcaster::new(
            tracker.clone(),
            status,
            BroadcasterConfig::default().with_interval(config.status_interval),
        ));
        let watchdog = IdleWatchdog::new(
            WatchdogPorts {
                notifier: notifier.clone(),
                actuator,
                settings: group_settings,
                stats: member_stats.clone(),
                clock: clock.clone(),
            },
            config.watchdog,
        );
        let calls = CallMonitor::new(notifier.clone(), clock);
        let stats = StatsRecorder::new(member_stats, notifier)
            .with_milestone_hours(config.milestone_hours);

        Self {
            watchdog,
            tracker,
            broadcaster,
            calls,
            stats,
        }
    }

    pub fn watchdog(&self) -> &IdleWatchdog {
        &self.watchdog
    }

    pub fn tracker(&self) -> &Arc<SessionTracker> {
        &self.tracker
    }

    pub fn broadcaster(&self) -> &Arc<StatusBroadcaster> {
        &self.broadcaster
    }

    /// Applies one presence event to every component.
    ///
    /// Never fails: collaborator errors are logged by the component that
    /// hit them and the rest of the event is still applied.
    pub async fn handle(&self, event: &PresenceEvent) -> SessionUpdate {
        debug!(
            group_id = %event.group_id(),
            member_id = %event.member(),
            "Presence event"
        );

        self.watchdog.on_event(event).await;

        let update = match self.tracker.handle(event).await {
            Ok(update) => update,
            Err(err) => {
                error!(error = %err, "Finished session was not persisted");
                TrackerError::into_update(err)
            }
        };

        self.stats.record(&update.intervals).await;
        self.calls.on_event(event).await;

        if !update.opened.is_empty() {
            self.broadcaster.ensure_running();
        } else if !update.closed.is_empty() && !self.tracker.has_active_sessions().await {
            self.broadcaster.stop().await;
        }

        update
    }

    /// Applies events from `events` until the channel closes or `shutdown`
    /// flips to true, then stops all timers.
    pub async fn run(
        &self,
        mut events: mpsc::Receiver<PresenceEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        info!("Presence coordinator started");

        loop {
            tokio::select! {
                biased;

                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        info!("Presence coordinator received shutdown signal");
                        break;
                    }
                }
                event = events.recv() => {
                    match event {
                        Some(event) => {
                            self.handle(&event).await;
                        }
                        None => {
                            info!("Presence event source closed");
                            break;
                        }
                    }
                }
            }
        }

        self.shutdown().await;
    }

    /// Cancels every watchdog timer and stops the broadcaster.
    pub async fn shutdown(&self) {
        self.watchdog.shutdown().await;
        self.broadcaster.stop().await;
        info!("Presence coordinator stopped");
    }
}
