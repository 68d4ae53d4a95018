//! In-memory adapters for every port.
//!
//! Used for tests and for single-process deployments without a database.
//! Each records what it was asked to do so tests can assert on it.

mod group_settings;
mod member_stats;
mod mute_actuator;
mod notifier;
mod session_store;
mod status_publisher;

pub use group_settings::InMemoryGroupSettingsRepository;
pub use member_stats::InMemoryMemberStatsRepository;
pub use mute_actuator::{ActuatorCall, InMemoryMuteActuator};
pub use notifier::InMemoryNotifier;
pub use session_store::InMemorySessionStore;
pub use status_publisher::InMemoryStatusPublisher;
