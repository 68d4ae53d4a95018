//! Status publisher that logs the status line.

use async_trait::async_trait;
use tracing::info;

use crate::domain::foundation::DomainError;
use crate::ports::StatusPublisher;

#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingStatusPublisher;

impl LoggingStatusPublisher {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StatusPublisher for LoggingStatusPublisher {
    async fn publish(&self, status: Option<&str>) -> Result<(), DomainError> {
        match status {
            Some(status) => info!(status, "Status"),
            None => info!("Status cleared"),
        }
        Ok(())
    }
}
