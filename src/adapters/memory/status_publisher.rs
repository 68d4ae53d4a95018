//! In-memory status publisher.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::DomainError;
use crate::ports::StatusPublisher;

/// Remembers the current status and every value ever published.
#[derive(Debug, Default)]
pub struct InMemoryStatusPublisher {
    history: RwLock<Vec<Option<String>>>,
}

impl InMemoryStatusPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    // === Test Helpers ===

    /// The status currently shown, if any.
    pub async fn current(&self) -> Option<String> {
        self.history.read().await.last().cloned().flatten()
    }

    pub async fn history(&self) -> Vec<Option<String>> {
        self.history.read().await.clone()
    }
}

#[async_trait]
impl StatusPublisher for InMemoryStatusPublisher {
    async fn publish(&self, status: Option<&str>) -> Result<(), DomainError> {
        self.history.write().await.push(status.map(str::to_string));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clearing_leaves_no_current_status() {
        let publisher = InMemoryStatusPublisher::new();
        publisher.publish(Some("Lounge: 00:00:15")).await.unwrap();
        assert_eq!(publisher.current().await.as_deref(), Some("Lounge: 00:00:15"));

        publisher.publish(None).await.unwrap();
        assert_eq!(publisher.current().await, None);
        assert_eq!(publisher.history().await.len(), 2);
    }
}
