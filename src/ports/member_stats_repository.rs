//! Member statistics repository port.
//!
//! Per-member call time is kept as monthly totals (`YYYY-MM`), fed by the
//! member intervals the session tracker emits. Mute counts are kept
//! alongside.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, MemberKey};

#[async_trait]
pub trait MemberStatsRepository: Send + Sync {
    /// Add `secs` to the member's total for `month_key`.
    async fn add_interval(&self, member: &MemberKey, month_key: &str, secs: i64)
        -> Result<(), DomainError>;

    /// All-time total in seconds (sum over months). Zero if unknown.
    async fn total_secs(&self, member: &MemberKey) -> Result<i64, DomainError>;

    /// Total in seconds for one month. Zero if unknown.
    async fn monthly_secs(&self, member: &MemberKey, month_key: &str) -> Result<i64, DomainError>;

    /// Count one more auto-mute and return the new count.
    async fn increment_mute_count(&self, member: &MemberKey) -> Result<u32, DomainError>;

    /// Number of auto-mutes so far. Zero if unknown.
    async fn mute_count(&self, member: &MemberKey) -> Result<u32, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_stats_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn MemberStatsRepository) {}
    }
}
