//! Presence domain module.
//!
//! Presence events describe a member entering, leaving or moving between
//! channels. Each event carries the roster of every affected channel as it
//! stands *after* the change; the engine never asks the source for occupancy.

mod events;

pub use events::{ChannelSnapshot, PresenceEvent};
