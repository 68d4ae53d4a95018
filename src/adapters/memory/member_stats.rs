//! In-memory member statistics.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, MemberKey};
use crate::ports::MemberStatsRepository;

#[derive(Debug, Default)]
struct MemberLedger {
    /// `YYYY-MM` -> seconds.
    monthly: HashMap<String, i64>,
    mutes: u32,
}

#[derive(Debug, Default)]
pub struct InMemoryMemberStatsRepository {
    ledgers: RwLock<HashMap<MemberKey, MemberLedger>>,
    fail_reads: AtomicBool,
}

impl InMemoryMemberStatsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `total_secs` fail until switched back.
    pub fn set_failing_reads(&self, failing: bool) {
        self.fail_reads.store(failing, Ordering::SeqCst);
    }
}

#[async_trait]
impl MemberStatsRepository for InMemoryMemberStatsRepository {
    async fn add_interval(
        &self,
        member: &MemberKey,
        month_key: &str,
        secs: i64,
    ) -> Result<(), DomainError> {
        let mut ledgers = self.ledgers.write().await;
        *ledgers
            .entry(*member)
            .or_default()
            .monthly
            .entry(month_key.to_string())
            .or_insert(0) += secs;
        Ok(())
    }

    async fn total_secs(&self, member: &MemberKey) -> Result<i64, DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::database("Member totals unavailable"));
        }
        Ok(self
            .ledgers
            .read()
            .await
            .get(member)
            .map(|l| l.monthly.values().sum())
            .unwrap_or(0))
    }

    async fn monthly_secs(&self, member: &MemberKey, month_key: &str) -> Result<i64, DomainError> {
        Ok(self
            .ledgers
            .read()
            .await
            .get(member)
            .and_then(|l| l.monthly.get(month_key).copied())
            .unwrap_or(0))
    }

    async fn increment_mute_count(&self, member: &MemberKey) -> Result<u32, DomainError> {
        let mut ledgers = self.ledgers.write().await;
        let ledger = ledgers.entry(*member).or_default();
        ledger.mutes += 1;
        Ok(ledger.mutes)
    }

    async fn mute_count(&self, member: &MemberKey) -> Result<u32, DomainError> {
        Ok(self
            .ledgers
            .read()
            .await
            .get(member)
            .map(|l| l.mutes)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn totals_sum_across_months() {
        let repo = InMemoryMemberStatsRepository::new();
        let member = MemberKey::new(1, 2);

        repo.add_interval(&member, "2024-01", 600).await.unwrap();
        repo.add_interval(&member, "2024-01", 60).await.unwrap();
        repo.add_interval(&member, "2024-02", 30).await.unwrap();

        assert_eq!(repo.monthly_secs(&member, "2024-01").await.unwrap(), 660);
        assert_eq!(repo.total_secs(&member).await.unwrap(), 690);
    }

    #[tokio::test]
    async fn unknown_member_reads_zero() {
        let repo = InMemoryMemberStatsRepository::new();
        let member = MemberKey::new(1, 2);

        assert_eq!(repo.total_secs(&member).await.unwrap(), 0);
        assert_eq!(repo.mute_count(&member).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn mute_counts_are_per_group() {
        let repo = InMemoryMemberStatsRepository::new();

        assert_eq!(repo.increment_mute_count(&MemberKey::new(1, 2)).await.unwrap(), 1);
        assert_eq!(repo.increment_mute_count(&MemberKey::new(1, 2)).await.unwrap(), 2);
        assert_eq!(repo.mute_count(&MemberKey::new(3, 2)).await.unwrap(), 0);
    }
}
