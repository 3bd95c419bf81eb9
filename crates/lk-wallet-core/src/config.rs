use crate::error::ConfigError;
use crate::network::{TESTNET, find_network};
use lk_api_types::NetworkInfo;
use lk_ledger_client::DEFAULT_TRANSACTION_LIMIT;
use lk_storage::{InMemoryStore, KeyValueStore, RocksDbStore, StorageResult, UsageLedger};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use url::Url;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime settings of a kit instance, read from `LUMENKIT_*` variables.
#[derive(Debug, Clone, PartialEq)]
pub struct KitConfig {
    pub network: NetworkInfo,
    /// Horizon endpoint; the selected network's own unless overridden.
    pub horizon_url: Url,
    pub transaction_limit: u32,
    /// RocksDB directory for the usage ledger. `None` keeps it in memory.
    pub ledger_path: Option<String>,
    pub bind_addr: SocketAddr,
}

impl KitConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());

        let network_id = value("LUMENKIT_NETWORK").unwrap_or_else(|| TESTNET.to_owned());
        let network = find_network(&network_id).ok_or(ConfigError::UnknownNetwork(network_id))?;

        let horizon = value("LUMENKIT_HORIZON_URL").unwrap_or_else(|| network.horizon_url.clone());
        let horizon_url = Url::parse(&horizon).map_err(|source| ConfigError::InvalidUrl {
            value: horizon.clone(),
            source,
        })?;

        let transaction_limit = match value("LUMENKIT_TX_LIMIT") {
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or(ConfigError::InvalidNumber {
                    name: "LUMENKIT_TX_LIMIT",
                    value: raw,
                })?,
            None => DEFAULT_TRANSACTION_LIMIT,
        };

        let bind = value("LUMENKIT_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_owned());
        let bind_addr = bind
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidBindAddr(bind.clone()))?;

        Ok(Self {
            network,
            horizon_url,
            transaction_limit,
            ledger_path: value("LUMENKIT_LEDGER_PATH"),
            bind_addr,
        })
    }

    pub fn open_ledger(&self) -> StorageResult<UsageLedger> {
        let store: Arc<dyn KeyValueStore> = match &self.ledger_path {
            Some(path) => {
                info!("usage ledger stored in {}", path);
                Arc::new(RocksDbStore::open_default(path)?)
            }
            None => Arc::new(InMemoryStore::default()),
        };
        Ok(UsageLedger::new(store))
    }
}
