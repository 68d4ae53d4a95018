//! Application layer - The coordination engine.
//!
//! - `SessionTracker` - Multi-participant sessions and member intervals
//! - `IdleWatchdog` - Lonely-channel prompts, auto-mute and rejoin unmute
//! - `StatusBroadcaster` - Periodic "active session" status
//! - `CallMonitor` - Call start/end announcements
//! - `StatsRecorder` - Monthly member ledger and milestones
//! - `PresenceCoordinator` - Routes each presence event through the above

mod call_monitor;
mod coordinator;
mod idle_watchdog;
mod session_tracker;
mod stats_recorder;
mod status_broadcaster;

pub use call_monitor::CallMonitor;
pub use coordinator::{Collaborators, EngineConfig, PresenceCoordinator};
pub use idle_watchdog::{IdleWatchdog, WatchdogConfig, WatchdogPorts, DEFAULT_UNMUTE_DELAY};
pub use session_tracker::{SessionSnapshot, SessionTracker, SessionUpdate, TrackerError};
pub use stats_recorder::StatsRecorder;
pub use status_broadcaster::{BroadcasterConfig, StatusBroadcaster, DEFAULT_STATUS_INTERVAL};
