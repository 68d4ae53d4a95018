//! PostgreSQL implementation of MemberStatsRepository.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{DomainError, MemberKey};
use crate::ports::MemberStatsRepository;

use super::db_id;

#[derive(Clone)]
pub struct PostgresMemberStatsRepository {
    pool: PgPool,
}

impl PostgresMemberStatsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(action: &str, e: sqlx::Error) -> DomainError {
    DomainError::database(format!("Failed to {}: {}", action, e))
}

#[async_trait]
impl MemberStatsRepository for PostgresMemberStatsRepository {
    async fn add_interval(
        &self,
        member: &MemberKey,
        month_key: &str,
        secs: i64,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO member_monthly_stats (group_id, member_id, month, total_secs)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (group_id, member_id, month)
            DO UPDATE SET total_secs = member_monthly_stats.total_secs + EXCLUDED.total_secs
            "#,
        )
        .bind(db_id(member.group_id.get())?)
        .bind(db_id(member.member_id.get())?)
        .bind(month_key)
        .bind(secs)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("add member interval", e))?;

        Ok(())
    }

    async fn total_secs(&self, member: &MemberKey) -> Result<i64, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT COALESCE(SUM(total_secs), 0)::BIGINT AS total
            FROM member_monthly_stats
            WHERE group_id = $1 AND member_id = $2
            "#,
        )
        .bind(db_id(member.group_id.get())?)
        .bind(db_id(member.member_id.get())?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("read member total", e))?;

        Ok(row.get("total"))
    }

    async fn monthly_secs(&self, member: &MemberKey, month_key: &str) -> Result<i64, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT total_secs
            FROM member_monthly_stats
            WHERE group_id = $1 AND member_id = $2 AND month = $3
            "#,
        )
        .bind(db_id(member.group_id.get())?)
        .bind(db_id(member.member_id.get())?)
        .bind(month_key)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("read member monthly total", e))?;

        Ok(row.map(|r| r.get("total_secs")).unwrap_or(0))
    }

    async fn increment_mute_count(&self, member: &MemberKey) -> Result<u32, DomainError> {
        let row = sqlx::query(
            r#"
            INSERT INTO member_mute_stats (group_id, member_id, mute_count)
            VALUES ($1, $2, 1)
            ON CONFLICT (group_id, member_id)
            DO UPDATE SET mute_count = member_mute_stats.mute_count + 1
            RETURNING mute_count
            "#,
        )
        .bind(db_id(member.group_id.get())?)
        .bind(db_id(member.member_id.get())?)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| db_error("increment mute count", e))?;

        let count: i32 = row.get("mute_count");
        Ok(count.max(0) as u32)
    }

    async fn mute_count(&self, member: &MemberKey) -> Result<u32, DomainError> {
        let row = sqlx::query(
            r#"
            SELECT mute_count FROM member_mute_stats
            WHERE group_id = $1 AND member_id = $2
            "#,
        )
        .bind(db_id(member.group_id.get())?)
        .bind(db_id(member.member_id.get())?)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("read mute count", e))?;

        let count: i32 = row.map(|r| r.get("mute_count")).unwrap_or(0);
        Ok(count.max(0) as u32)
    }
}
