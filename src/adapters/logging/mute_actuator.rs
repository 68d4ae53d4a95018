//! Actuator that only logs what it would do.

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::{DomainError, MemberKey};
use crate::ports::MuteActuator;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMuteActuator;

impl LoggingMuteActuator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MuteActuator for LoggingMuteActuator {
    async fn mute(&self, member: &MemberKey) -> Result<(), DomainError> {
        info!(group_id = %member.group_id, member_id = %member.member_id, "Mute");
        Ok(())
    }

    async fn unmute(&self, member: &MemberKey) -> Result<(), DomainError> {
        info!(group_id = %member.group_id, member_id = %member.member_id, "Unmute");
        Ok(())
    }
}
