//! PostgreSQL adapters - Database implementations for the persistence ports.
//!
//! - `PostgresSessionStore` - Finished sessions and their participants
//! - `PostgresMemberStatsRepository` - Monthly call time and mute counts
//! - `PostgresGroupSettingsRepository` - Per-group watchdog timings

mod group_settings;
mod member_stats;
mod session_store;

pub use group_settings::PostgresGroupSettingsRepository;
pub use member_stats::PostgresMemberStatsRepository;
pub use session_store::PostgresSessionStore;

use secrecy::ExposeSecret;
use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::domain::foundation::DomainError;

/// Opens a pool sized by `config` and, if asked to, applies the bundled
/// migrations.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DomainError> {
    let pool = PgPoolOptions::new()
        .max_connections(config.pool_size)
        .acquire_timeout(config.acquire_timeout())
        .connect(config.url.expose_secret())
        .await
        .map_err(|e| {
            DomainError::database(format!("Failed to connect to database: {}", e))
        })?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            DomainError::database(format!("Failed to run migrations: {}", e))
        })?;
    }

    Ok(pool)
}

/// Converts a platform id for a signed BIGINT column.
pub(crate) fn db_id(id: u64) -> Result<i64, DomainError> {
    i64::try_from(id)
        .map_err(|_| DomainError::database(format!("Id {} does not fit a BIGINT column", id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn snowflake_sized_ids_convert_unchanged() {
        assert_eq!(db_id(1_234_567_890_123_456_789).unwrap(), 1_234_567_890_123_456_789);
        assert_eq!(db_id(i64::MAX as u64).unwrap(), i64::MAX);
    }

    #[test]
    fn ids_past_bigint_range_are_rejected() {
        let err = db_id(u64::MAX).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert!(err.message.contains(&u64::MAX.to_string()));
        assert!(db_id(1 << 63).is_err());
    }
}
