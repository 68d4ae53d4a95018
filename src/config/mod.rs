//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `CALLWATCH` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use callwatch::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Lonely timeout: {} minutes", config.watchdog.lonely_timeout_minutes);
//! ```

mod database;
mod engine;
mod error;
mod logging;
mod watchdog;

pub use database::DatabaseConfig;
pub use engine::{SessionConfig, StatsConfig, StatusConfig};
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use watchdog::WatchdogConfig;

use serde::Deserialize;

use crate::application::{self, EngineConfig};

/// Root application configuration
///
/// Every section has defaults, so an empty environment yields a working
/// in-memory setup. Load using [`AppConfig::load()`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Idle watchdog defaults
    #[serde(default)]
    pub watchdog: WatchdogConfig,

    /// Session threshold
    #[serde(default)]
    pub session: SessionConfig,

    /// Status broadcaster interval
    #[serde(default)]
    pub status: StatusConfig,

    /// Member statistics
    #[serde(default)]
    pub stats: StatsConfig,

    /// Database configuration (PostgreSQL); in-memory storage when absent
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CALLWATCH` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CALLWATCH__WATCHDOG__LONELY_TIMEOUT_MINUTES=180` -> `watchdog.lonely_timeout_minutes = 180`
    /// - `CALLWATCH__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CALLWATCH")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.watchdog.validate()?;
        self.session.validate()?;
        self.status.validate()?;
        self.stats.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.logging.validate()?;
        Ok(())
    }

    /// Engine tuning derived from this configuration.
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            watchdog: application::WatchdogConfig::default()
                .with_unmute_delay(self.watchdog.unmute_delay())
                .with_confirmation_marker(self.watchdog.confirmation_marker.clone())
                .with_fallback_settings(self.watchdog.default_group_settings()),
            min_session_members: self.session.min_members,
            status_interval: self.status.interval(),
            milestone_hours: self.stats.milestone_hours,
        }
    }
}
