//! Ports - Interfaces for external collaborators.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! coordination engine and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `SessionStore` - Durable append of finished sessions
//! - `MemberStatsRepository` - Monthly call-time totals and mute counts
//! - `GroupSettingsRepository` - Per-group watchdog timings
//!
//! ## Outbound Ports
//!
//! - `Notifier` - Confirmation prompts and announcements
//! - `MuteActuator` - Silence/unsilence a member
//! - `StatusPublisher` - The "active session" status line
//!
//! ## Runtime Ports
//!
//! - `Clock` - Source of timestamps

mod clock;
mod group_settings_repository;
mod member_stats_repository;
mod mute_actuator;
mod notifier;
mod session_store;
mod status_publisher;

pub use clock::Clock;
pub use group_settings_repository::GroupSettingsRepository;
pub use member_stats_repository::MemberStatsRepository;
pub use mute_actuator::MuteActuator;
pub use notifier::{Notifier, PromptHandle};
pub use session_store::SessionStore;
pub use status_publisher::StatusPublisher;
