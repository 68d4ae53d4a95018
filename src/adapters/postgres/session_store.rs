//! PostgreSQL implementation of SessionStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::DomainError;
use crate::domain::session::SessionRecord;
use crate::ports::SessionStore;

use super::db_id;

/// Appends finished sessions to `sessions` / `session_participants`.
///
/// Both inserts run in one transaction, so a failure leaves nothing behind.
#[derive(Clone)]
pub struct PostgresSessionStore {
    pool: PgPool,
}

impl PostgresSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for PostgresSessionStore {
    async fn persist_session(&self, record: &SessionRecord) -> Result<(), DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::database(format!("Failed to begin transaction: {}", e))
        })?;

        let row = sqlx::query(
            r#"
            INSERT INTO sessions (group_id, channel_id, started_at, duration_secs)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(db_id(record.channel.group_id.get())?)
        .bind(db_id(record.channel.channel_id.get())?)
        .bind(record.started_at.as_datetime())
        .bind(record.duration_secs())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to insert session: {}", e))
        })?;

        let session_id: i64 = row.get("id");

        if !record.participants.is_empty() {
            let members = record
                .participants
                .iter()
                .map(|m| db_id(m.get()))
                .collect::<Result<Vec<i64>, _>>()?;

            sqlx::query(
                r#"
                INSERT INTO session_participants (session_id, member_id)
                SELECT $1, UNNEST($2::BIGINT[])
                "#,
            )
            .bind(session_id)
            .bind(members)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::database(format!("Failed to insert session participants: {}", e))
            })?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::database(format!("Failed to commit session: {}", e))
        })?;

        Ok(())
    }
}
