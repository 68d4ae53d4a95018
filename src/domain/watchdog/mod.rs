//! Idle watchdog domain module.
//!
//! Models the per-channel "lonely" cycle: a solitary member is watched, then
//! prompted, then muted if they never answer. Members we muted are kept in a
//! [`MuteRecord`] so the mute can be reversed when they come back.

mod idle_watch;
mod mute_record;
mod prompt;
mod settings;
mod state;

pub use idle_watch::IdleWatch;
pub use mute_record::MuteRecord;
pub use prompt::{
    ConfirmationOutcome, ConfirmationPrompt, PromptStatus, DEFAULT_CONFIRMATION_MARKER,
};
pub use settings::{GroupSettings, DEFAULT_LONELY_TIMEOUT_MINUTES, DEFAULT_REACTION_WAIT_MINUTES};
pub use state::WatchState;
