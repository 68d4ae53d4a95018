//! Session domain module.
//!
//! Tracks multi-participant occupancy of a channel. A session opens when a
//! channel reaches the member threshold, records each member's join time,
//! and closes into a [`SessionRecord`] when occupancy falls back below it.
//! Every departure yields a [`MemberInterval`].

mod aggregate;
mod interval;

pub use aggregate::{Session, MIN_SESSION_MEMBERS};
pub use interval::{MemberInterval, SessionRecord};
