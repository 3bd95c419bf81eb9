use async_trait::async_trait;
use rocksdb::{DB, Options};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

mod ledger;

pub use ledger::{USED_WALLETS_KEY, UsageLedger, UsageRecord};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("rocksdb: {0}")]
    RocksDb(#[from] rocksdb::Error),

    #[error("corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("storage backend: {0}")]
    Backend(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Durable key/value backend behind the usage ledger.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;
    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()>;
}

#[derive(Default)]
pub struct InMemoryStore {
    entries: RwLock<HashMap<String, Vec<u8>>>,
}

#[async_trait]
impl KeyValueStore for InMemoryStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let guard = self.entries.read().await;
        Ok(guard.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        let mut guard = self.entries.write().await;
        guard.insert(key.to_owned(), value);
        Ok(())
    }
}

pub struct RocksDbStore {
    db: Arc<DB>,
}

impl RocksDbStore {
    pub fn open_default(path: &str) -> StorageResult<Self> {
        let mut options = Options::default();
        options.create_if_missing(true);
        let db = DB::open(&options, path)?;
        Ok(Self { db: Arc::new(db) })
    }

    fn key_for(key: &str) -> String {
        format!("kv:{key}")
    }
}

#[async_trait]
impl KeyValueStore for RocksDbStore {
    async fn get(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let value = self.db.get(Self::key_for(key).as_bytes())?;
        Ok(value)
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        self.db.put(Self::key_for(key).as_bytes(), value)?;
        Ok(())
    }
}
