//! PostgreSQL implementation of GroupSettingsRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, GroupId};
use crate::domain::watchdog::GroupSettings;
use crate::ports::GroupSettingsRepository;

use super::db_id;

/// Stored per-group settings; groups without a row get `defaults`.
#[derive(Clone)]
pub struct PostgresGroupSettingsRepository {
    pool: PgPool,
    defaults: GroupSettings,
}

impl PostgresGroupSettingsRepository {
    pub fn new(pool: PgPool, defaults: GroupSettings) -> Self {
        Self { pool, defaults }
    }
}

#[async_trait]
impl GroupSettingsRepository for PostgresGroupSettingsRepository {
    async fn get(&self, group: GroupId) -> Result<GroupSettings, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT lonely_timeout_minutes, reaction_wait_minutes
            FROM group_settings
            WHERE group_id = $1
            "#,
        )
        .bind(db_id(group.get())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to read group settings: {}", e))
        })?;

        match row {
            Some(row) => {
                let lonely: i32 = row.get("lonely_timeout_minutes");
                let wait: i32 = row.get("reaction_wait_minutes");
                Ok(GroupSettings::new(lonely.max(0) as u32, wait.max(0) as u32)?)
            }
            None => Ok(self.defaults),
        }
    }

    async fn update(
        &self,
        group: GroupId,
        lonely_timeout_minutes: Option<u32>,
        reaction_wait_minutes: Option<u32>,
    ) -> Result<GroupSettings, DomainError> {
        let updated = self
            .get(group)
            .await?
            .with_updates(lonely_timeout_minutes, reaction_wait_minutes)?;

        sqlx::query(
            r#"
            INSERT INTO group_settings (group_id, lonely_timeout_minutes, reaction_wait_minutes)
            VALUES ($1, $2, $3)
            ON CONFLICT (group_id) DO UPDATE SET
                lonely_timeout_minutes = EXCLUDED.lonely_timeout_minutes,
                reaction_wait_minutes = EXCLUDED.reaction_wait_minutes,
                updated_at = now()
            "#,
        )
        .bind(db_id(group.get())?)
        .bind(updated.lonely_timeout_minutes() as i32)
        .bind(updated.reaction_wait_minutes() as i32)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to update group settings: {}", e))
        })?;

        Ok(updated)
    }
}
