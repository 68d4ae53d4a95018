//! Per-group watchdog settings.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::foundation::ValidationError;

/// Minutes a member may sit alone before being prompted.
pub const DEFAULT_LONELY_TIMEOUT_MINUTES: u32 = 180;

/// Minutes a member has to answer a prompt.
pub const DEFAULT_REACTION_WAIT_MINUTES: u32 = 5;

/// Idle-watch timings for one group. Both values are at least one minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSettings {
    lonely_timeout_minutes: u32,
    reaction_wait_minutes: u32,
}

impl GroupSettings {
    /// Creates validated settings.
    ///
    /// # Errors
    ///
    /// - `BelowMinimum` if either value is zero
    pub fn new(lonely_timeout_minutes: u32, reaction_wait_minutes: u32) -> Result<Self, ValidationError> {
        Self::validate_minutes("lonely_timeout_minutes", lonely_timeout_minutes)?;
        Self::validate_minutes("reaction_wait_minutes", reaction_wait_minutes)?;
        Ok(Self {
            lonely_timeout_minutes,
            reaction_wait_minutes,
        })
    }

    pub fn lonely_timeout_minutes(&self) -> u32 {
        self.lonely_timeout_minutes
    }

    pub fn reaction_wait_minutes(&self) -> u32 {
        self.reaction_wait_minutes
    }

    pub fn lonely_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.lonely_timeout_minutes) * 60)
    }

    pub fn reaction_wait(&self) -> Duration {
        Duration::from_secs(u64::from(self.reaction_wait_minutes) * 60)
    }

    /// Returns a copy with the supplied fields replaced.
    ///
    /// Fields left as `None` keep their current value.
    pub fn with_updates(
        &self,
        lonely_timeout_minutes: Option<u32>,
        reaction_wait_minutes: Option<u32>,
    ) -> Result<Self, ValidationError> {
        Self::new(
            lonely_timeout_minutes.unwrap_or(self.lonely_timeout_minutes),
            reaction_wait_minutes.unwrap_or(self.reaction_wait_minutes),
        )
    }

    fn validate_minutes(field: &str, minutes: u32) -> Result<(), ValidationError> {
        if minutes < 1 {
            return Err(ValidationError::below_minimum(field, 1, i64::from(minutes)));
        }
        Ok(())
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            lonely_timeout_minutes: DEFAULT_LONELY_TIMEOUT_MINUTES,
            reaction_wait_minutes: DEFAULT_REACTION_WAIT_MINUTES,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_three_hours_and_five_minutes() {
        let settings = GroupSettings::default();
        assert_eq!(settings.lonely_timeout(), Duration::from_secs(3 * 60 * 60));
        assert_eq!(settings.reaction_wait(), Duration::from_secs(5 * 60));
    }

    #[test]
    fn zero_minutes_rejected() {
        assert!(GroupSettings::new(0, 5).is_err());
        assert!(GroupSettings::new(180, 0).is_err());
    }

    #[test]
    fn one_minute_is_allowed() {
        let settings = GroupSettings::new(1, 1).unwrap();
        assert_eq!(settings.lonely_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn partial_update_keeps_other_field() {
        let settings = GroupSettings::default().with_updates(Some(30), None).unwrap();
        assert_eq!(settings.lonely_timeout_minutes(), 30);
        assert_eq!(settings.reaction_wait_minutes(), DEFAULT_REACTION_WAIT_MINUTES);
    }

    #[test]
    fn invalid_update_is_rejected() {
        assert!(GroupSettings::default().with_updates(None, Some(0)).is_err());
    }
}
