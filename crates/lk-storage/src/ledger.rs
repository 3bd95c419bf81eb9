//! Persistent record of which wallets the user picked, most recent first.
//!
//! Faults never leave this module: a ledger that cannot be read is treated as
//! empty and a failed write only costs ranking history.

use crate::{KeyValueStore, StorageResult};
use lk_api_types::WalletId;
use std::sync::Arc;
use tracing::warn;

/// Storage key shared with existing browser installs of the kit.
pub const USED_WALLETS_KEY: &str = "@StellarWalletsKit/usedWalletsIds";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageRecord(Vec<WalletId>);

impl UsageRecord {
    pub fn new(ids: Vec<WalletId>) -> Self {
        Self(ids)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> &[WalletId] {
        &self.0
    }

    /// Index of `id` in the record; 0 is the most recently used wallet.
    pub fn position(&self, id: &WalletId) -> Option<usize> {
        self.0.iter().position(|entry| entry == id)
    }

    fn with_front(mut self, id: &WalletId) -> Self {
        self.0.retain(|entry| entry != id);
        self.0.insert(0, id.clone());
        self
    }
}

impl From<Vec<&str>> for UsageRecord {
    fn from(ids: Vec<&str>) -> Self {
        Self(ids.into_iter().map(WalletId::from).collect())
    }
}

#[derive(Clone)]
pub struct UsageLedger {
    store: Arc<dyn KeyValueStore>,
}

impl UsageLedger {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub async fn read(&self) -> UsageRecord {
        match self.try_read().await {
            Ok(record) => record,
            Err(err) => {
                warn!("usage ledger unreadable, ranking without history: {}", err);
                UsageRecord::default()
            }
        }
    }

    /// Moves `wallet_id` to the front of the record and persists it.
    ///
    /// Returns the record as it should now be stored, even when the write
    /// itself failed.
    pub async fn record_use(&self, wallet_id: &WalletId) -> UsageRecord {
        let record = self.read().await.with_front(wallet_id);
        if let Err(err) = self.try_write(&record).await {
            warn!("failed to persist wallet usage for {}: {}", wallet_id, err);
        }
        record
    }

    async fn try_read(&self) -> StorageResult<UsageRecord> {
        let Some(raw) = self.store.get(USED_WALLETS_KEY).await? else {
            return Ok(UsageRecord::default());
        };
        let ids = serde_json::from_slice::<Vec<WalletId>>(&raw)?;
        Ok(UsageRecord(ids))
    }

    async fn try_write(&self, record: &UsageRecord) -> StorageResult<()> {
        let value = serde_json::to_vec(&record.0)?;
        self.store.put(USED_WALLETS_KEY, value).await
    }
}
