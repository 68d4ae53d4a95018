//! Mute actuator port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberKey};

/// Port for silencing and unsilencing a member within their group.
///
/// Both calls are externally latent and may fail; the watchdog logs the
/// failure and moves on.
#[async_trait]
pub trait MuteActuator: Send + Sync {
    /// Silence `member`.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member is gone; the watchdog treats this
    ///   as nothing left to do
    /// - `ActuatorFailed` for anything else, including a refused mute
    async fn mute(&self, member: &MemberKey) -> Result<(), DomainError>;

    /// Reverse a previous mute.
    ///
    /// # Errors
    ///
    /// - `MemberNotFound` if the member is gone; the mute record is released
    /// - `ActuatorFailed` for anything else; retried on the next rejoin
    async fn unmute(&self, member: &MemberKey) -> Result<(), DomainError>;
}
