//! Idle watchdog configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::watchdog::{
    GroupSettings, DEFAULT_CONFIRMATION_MARKER, DEFAULT_LONELY_TIMEOUT_MINUTES,
    DEFAULT_REACTION_WAIT_MINUTES,
};

use super::error::ValidationError;

/// Watchdog defaults. Groups with stored settings override the two timings.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchdogConfig {
    /// Minutes alone before the member is prompted
    #[serde(default = "default_lonely_timeout")]
    pub lonely_timeout_minutes: u32,

    /// Minutes the member has to answer
    #[serde(default = "default_reaction_wait")]
    pub reaction_wait_minutes: u32,

    /// Pause before unmuting a returning member
    #[serde(default = "default_unmute_delay")]
    pub unmute_delay_millis: u64,

    /// Marker the member answers with
    #[serde(default = "default_marker")]
    pub confirmation_marker: String,
}

impl WatchdogConfig {
    pub fn unmute_delay(&self) -> Duration {
        Duration::from_millis(self.unmute_delay_millis)
    }

    /// Settings for groups that have none stored.
    ///
    /// Falls back to the built-in defaults if the configured values are
    /// invalid; `validate` reports those.
    pub fn default_group_settings(&self) -> GroupSettings {
        GroupSettings::new(self.lonely_timeout_minutes, self.reaction_wait_minutes)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_at_least(
            "watchdog.lonely_timeout_minutes",
            u64::from(self.lonely_timeout_minutes),
            1,
        )?;
        ValidationError::require_at_least(
            "watchdog.reaction_wait_minutes",
            u64::from(self.reaction_wait_minutes),
            1,
        )?;
        if self.confirmation_marker.trim().is_empty() {
            return Err(ValidationError::EmptyConfirmationMarker);
        }
        Ok(())
    }
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self {
            lonely_timeout_minutes: default_lonely_timeout(),
            reaction_wait_minutes: default_reaction_wait(),
            unmute_delay_millis: default_unmute_delay(),
            confirmation_marker: default_marker(),
        }
    }
}

fn default_lonely_timeout() -> u32 {
    DEFAULT_LONELY_TIMEOUT_MINUTES
}

fn default_reaction_wait() -> u32 {
    DEFAULT_REACTION_WAIT_MINUTES
}

fn default_unmute_delay() -> u64 {
    1000
}

fn default_marker() -> String {
    DEFAULT_CONFIRMATION_MARKER.to_string()
}
