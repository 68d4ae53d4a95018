//! In-memory session store.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::session::SessionRecord;
use crate::ports::SessionStore;

/// Keeps finished sessions in a vector.
///
/// Used by single-process deployments without a database and as the store
/// double in tests. Can be switched to fail every call.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    records: RwLock<Vec<SessionRecord>>,
    fail_writes: AtomicBool,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent writes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.fail_writes.store(failing, Ordering::SeqCst);
    }

    // === Test Helpers ===

    /// All persisted records, in persist order.
    pub async fn records(&self) -> Vec<SessionRecord> {
        self.records.read().await.clone()
    }

    pub async fn record_count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn persist_session(&self, record: &SessionRecord) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to persist session for channel {}", record.channel),
            ));
        }
        self.records.write().await.push(record.clone());
        Ok(())
    }
}
