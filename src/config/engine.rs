//! Session, status and statistics configuration

use serde::Deserialize;
use std::time::Duration;

use crate::domain::session::MIN_SESSION_MEMBERS;
use crate::domain::stats::DEFAULT_MILESTONE_HOURS;

use super::error::ValidationError;

/// Session tracking configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Occupancy at which a channel counts as a session
    #[serde(default = "default_min_members")]
    pub min_members: usize,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_at_least(
            "session.min_members",
            self.min_members as u64,
            MIN_SESSION_MEMBERS as u64,
        )
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            min_members: default_min_members(),
        }
    }
}

/// Status broadcaster configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatusConfig {
    /// Seconds between status updates
    #[serde(default = "default_status_interval")]
    pub interval_secs: u64,
}

impl StatusConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_at_least("status.interval_secs", self.interval_secs, 1)
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_status_interval(),
        }
    }
}

/// Member statistics configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StatsConfig {
    /// Cumulative hours between milestone announcements
    #[serde(default = "default_milestone_hours")]
    pub milestone_hours: u32,
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::require_at_least("stats.milestone_hours", u64::from(self.milestone_hours), 1)
    }
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            milestone_hours: default_milestone_hours(),
        }
    }
}

fn default_min_members() -> usize {
    MIN_SESSION_MEMBERS
}

fn default_status_interval() -> u64 {
    15
}

fn default_milestone_hours() -> u32 {
    DEFAULT_MILESTONE_HOURS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(SessionConfig::default().validate().is_ok());
        assert!(StatusConfig::default().validate().is_ok());
        assert!(StatsConfig::default().validate().is_ok());
        assert_eq!(StatusConfig::default().interval(), Duration::from_secs(15));
    }

    #[test]
    fn test_single_member_sessions_rejected() {
        let config = SessionConfig { min_members: 1 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_interval_rejected() {
        let config = StatusConfig { interval_secs: 0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_milestone_rejected() {
        let config = StatsConfig { milestone_hours: 0 };
        assert!(config.validate().is_err());
    }
}
