//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, errors, state machine trait)
//! - `presence` - Presence change events and channel rosters
//! - `session` - Multi-participant session aggregate and its records
//! - `watchdog` - Idle watch, confirmation prompt and mute record
//! - `stats` - Rules over per-member call-time totals
//! - `announcement` - Outcomes the engine asks the notifier to announce

pub mod announcement;
pub mod foundation;
pub mod presence;
pub mod session;
pub mod stats;
pub mod watchdog;

pub use announcement::Announcement;
