//! Session store port.
//!
//! Durable append of finished multi-participant sessions.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::domain::session::SessionRecord;

/// Port for persisting finished sessions.
///
/// Implementations must:
/// - accept a record with an empty participant list
/// - leave no partial record behind when they return an error
///
/// The tracker does not retry. A caller that retries may persist the same
/// session twice, which is preferred over holding it in memory.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Append one finished session.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn persist_session(&self, record: &SessionRecord) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_store_is_object_safe() {
        fn _accepts_dyn(_store: &dyn SessionStore) {}
    }
}
