//! Group settings repository port.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, GroupId};
use crate::domain::watchdog::GroupSettings;

/// Port for the per-group watchdog settings.
///
/// Read-only from the watchdog's point of view; `update` exists for the
/// operator-facing surface that owns the settings.
#[async_trait]
pub trait GroupSettingsRepository: Send + Sync {
    /// Settings for `group`, or the defaults if none are stored.
    async fn get(&self, group: GroupId) -> Result<GroupSettings, DomainError>;

    /// Replace the supplied fields and return the resulting settings.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if a supplied value is below one minute
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        group: GroupId,
        lonely_timeout_minutes: Option<u32>,
        reaction_wait_minutes: Option<u32>,
    ) -> Result<GroupSettings, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_settings_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn GroupSettingsRepository) {}
    }
}
