//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' must be at least {min}, got {actual}")]
    BelowMinimum { field: String, min: i64, actual: i64 },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn below_minimum(field: impl Into<String>, min: i64, actual: i64) -> Self {
        ValidationError::BelowMinimum {
            field: field.into(),
            min,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Which collaborator concern a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// A value read back or supplied by a caller was out of range.
    ValidationFailed,
    /// The member has left the group or the platform no longer knows them.
    MemberNotFound,
    NotificationFailed,
    ActuatorFailed,
    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "validation_failed",
            ErrorCode::MemberNotFound => "member_not_found",
            ErrorCode::NotificationFailed => "notification_failed",
            ErrorCode::ActuatorFailed => "actuator_failed",
            ErrorCode::DatabaseError => "database_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure reported by any port.
///
/// The engine never branches on the adapter that produced it; it logs the
/// error and abandons the step, except where `is_not_found` says the target
/// member is simply gone.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DatabaseError, message)
    }

    /// True when the member the call targeted no longer exists.
    pub fn is_not_found(&self) -> bool {
        self.code == ErrorCode::MemberNotFound
    }
}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(ErrorCode::ValidationFailed, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_minimum_names_field_and_bound() {
        let err = ValidationError::below_minimum("lonely_timeout_minutes", 1, 0);
        assert_eq!(
            err.to_string(),
            "Field 'lonely_timeout_minutes' must be at least 1, got 0"
        );
    }

    #[test]
    fn invalid_format_carries_reason() {
        let err = ValidationError::invalid_format("confirmation_marker", "must not be blank");
        assert_eq!(
            err.to_string(),
            "Field 'confirmation_marker' has invalid format: must not be blank"
        );
    }

    #[test]
    fn domain_error_prefixes_message_with_code() {
        let err = DomainError::database("connection reset");
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.to_string(), "database_error: connection reset");
    }

    #[test]
    fn only_missing_member_counts_as_not_found() {
        assert!(DomainError::new(ErrorCode::MemberNotFound, "left the group").is_not_found());
        for code in [
            ErrorCode::ActuatorFailed,
            ErrorCode::NotificationFailed,
            ErrorCode::DatabaseError,
        ] {
            assert!(!DomainError::new(code, "x").is_not_found(), "{}", code);
        }
    }

    #[test]
    fn validation_failure_keeps_its_text() {
        let err: DomainError = ValidationError::below_minimum("unmute_delay_secs", 1, 0).into();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert!(err.message.contains("unmute_delay_secs"));
    }
}
