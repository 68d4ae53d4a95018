//! In-memory mute actuator.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, MemberKey};
use crate::ports::MuteActuator;

/// One call made to the actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Mute(MemberKey),
    Unmute(MemberKey),
}

/// Keeps the set of currently silenced members and a log of every call.
#[derive(Debug, Default)]
pub struct InMemoryMuteActuator {
    muted: RwLock<HashSet<MemberKey>>,
    calls: RwLock<Vec<ActuatorCall>>,
    departed: RwLock<HashSet<MemberKey>>,
    fail_calls: AtomicBool,
    latency: Option<Duration>,
}

impl InMemoryMuteActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call sleeps for `latency` before taking effect.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes subsequent calls fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_calls.store(failing, Ordering::SeqCst);
    }

    /// Calls targeting `member` fail with `MemberNotFound` from now on.
    pub async fn depart(&self, member: MemberKey) {
        self.departed.write().await.insert(member);
    }

    // === Test Helpers ===

    pub async fn is_muted(&self, member: &MemberKey) -> bool {
        self.muted.read().await.contains(member)
    }

    pub async fn calls(&self) -> Vec<ActuatorCall> {
        self.calls.read().await.clone()
    }

    pub async fn mute_calls(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Mute(_)))
            .count()
    }

    pub async fn unmute_calls(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| matches!(c, ActuatorCall::Unmute(_)))
            .count()
    }

    async fn apply(&self, call: ActuatorCall) -> Result<(), DomainError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.calls.write().await.push(call);

        if self.fail_calls.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::ActuatorFailed,
                format!("Actuator rejected {:?}", call),
            ));
        }

        let target = match call {
            ActuatorCall::Mute(member) | ActuatorCall::Unmute(member) => member,
        };
        if self.departed.read().await.contains(&target) {
            return Err(DomainError::new(
                ErrorCode::MemberNotFound,
                format!("Member {} is no longer in the group", target),
            ));
        }

        let mut muted = self.muted.write().await;
        match call {
            ActuatorCall::Mute(member) => {
                muted.insert(member);
            }
            ActuatorCall::Unmute(member) => {
                muted.remove(&member);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl MuteActuator for InMemoryMuteActuator {
    async fn mute(&self, member: &MemberKey) -> Result<(), DomainError> {
        self.apply(ActuatorCall::Mute(*member)).await
    }

    async fn unmute(&self, member: &MemberKey) -> Result<(), DomainError> {
        self.apply(ActuatorCall::Unmute(*member)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mute_then_unmute_round_trips_state() {
        let actuator = InMemoryMuteActuator::new();
        let member = MemberKey::new(1, 2);

        actuator.mute(&member).await.unwrap();
        assert!(actuator.is_muted(&member).await);

        actuator.unmute(&member).await.unwrap();
        assert!(!actuator.is_muted(&member).await);
        assert_eq!(
            actuator.calls().await,
            vec![ActuatorCall::Mute(member), ActuatorCall::Unmute(member)]
        );
    }

    #[tokio::test]
    async fn failed_call_is_logged_but_has_no_effect() {
        let actuator = InMemoryMuteActuator::new();
        actuator.set_failing(true);
        let member = MemberKey::new(1, 2);

        assert!(actuator.mute(&member).await.is_err());
        assert!(!actuator.is_muted(&member).await);
        assert_eq!(actuator.mute_calls().await, 1);
    }

    #[tokio::test]
    async fn departed_member_is_reported_missing() {
        let actuator = InMemoryMuteActuator::new();
        let gone = MemberKey::new(1, 2);
        let here = MemberKey::new(1, 3);
        actuator.depart(gone).await;

        let err = actuator.mute(&gone).await.unwrap_err();
        assert!(err.is_not_found());
        assert!(!actuator.is_muted(&gone).await);

        actuator.mute(&here).await.unwrap();
        assert!(actuator.is_muted(&here).await);
    }
}
