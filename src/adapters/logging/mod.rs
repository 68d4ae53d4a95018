//! Log-only adapters for the outbound ports.
//!
//! The binary uses these when no chat platform is wired in: every prompt,
//! announcement, mute and status change becomes a `tracing` event.

mod mute_actuator;
mod notifier;
mod status_publisher;

pub use mute_actuator::LoggingMuteActuator;
pub use notifier::LoggingNotifier;
pub use status_publisher::LoggingStatusPublisher;
