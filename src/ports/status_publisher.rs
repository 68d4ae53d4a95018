//! Status publisher port.

use async_trait::async_trait;

use crate::domain::foundation::DomainError;

/// Port for the single "currently active session" status line.
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Publish `status`, or clear it with `None`.
    async fn publish(&self, status: Option<&str>) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_publisher_is_object_safe() {
        fn _accepts_dyn(_publisher: &dyn StatusPublisher) {}
    }
}
