//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("{field} must be at least {min}")]
    BelowMinimum { field: &'static str, min: u64 },

    #[error("Confirmation marker must not be empty")]
    EmptyConfirmationMarker,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("{field} must be at most {max}")]
    AboveMaximum { field: &'static str, max: u64 },
}

impl ValidationError {
    pub(crate) fn require_at_least(field: &'static str, value: u64, min: u64) -> Result<(), Self> {
        if value < min {
            return Err(ValidationError::BelowMinimum { field, min });
        }
        Ok(())
    }
}
