//! In-memory group settings repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, GroupId};
use crate::domain::watchdog::GroupSettings;
use crate::ports::GroupSettingsRepository;

/// Per-group settings held in a map, falling back to configured defaults.
#[derive(Debug, Default)]
pub struct InMemoryGroupSettingsRepository {
    defaults: GroupSettings,
    settings: RwLock<HashMap<GroupId, GroupSettings>>,
}

impl InMemoryGroupSettingsRepository {
    pub fn new(defaults: GroupSettings) -> Self {
        Self {
            defaults,
            settings: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GroupSettingsRepository for InMemoryGroupSettingsRepository {
    async fn get(&self, group: GroupId) -> Result<GroupSettings, DomainError> {
        Ok(self
            .settings
            .read()
            .await
            .get(&group)
            .copied()
            .unwrap_or(self.defaults))
    }

    async fn update(
        &self,
        group: GroupId,
        lonely_timeout_minutes: Option<u32>,
        reaction_wait_minutes: Option<u32>,
    ) -> Result<GroupSettings, DomainError> {
        let mut settings = self.settings.write().await;
        let current = settings.get(&group).copied().unwrap_or(self.defaults);
        let updated = current.with_updates(lonely_timeout_minutes, reaction_wait_minutes)?;
        settings.insert(group, updated);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[tokio::test]
    async fn unknown_group_gets_defaults() {
        let defaults = GroupSettings::new(30, 2).unwrap();
        let repo = InMemoryGroupSettingsRepository::new(defaults);

        assert_eq!(repo.get(GroupId::new(9)).await.unwrap(), defaults);
    }

    #[tokio::test]
    async fn update_touches_only_supplied_fields() {
        let repo = InMemoryGroupSettingsRepository::default();
        let group = GroupId::new(1);

        let updated = repo.update(group, Some(60), None).await.unwrap();

        assert_eq!(updated.lonely_timeout_minutes(), 60);
        assert_eq!(updated.reaction_wait_minutes(), 5);
        assert_eq!(repo.get(group).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn zero_minutes_is_rejected_and_nothing_stored() {
        let repo = InMemoryGroupSettingsRepository::default();
        let group = GroupId::new(1);

        let err = repo.update(group, None, Some(0)).await.unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationFailed);
        assert_eq!(repo.get(group).await.unwrap(), GroupSettings::default());
    }
}
