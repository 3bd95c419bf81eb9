use async_trait::async_trait;
use lk_api_types::{Address, Transaction};

/// Number of transactions the account views ask for by default.
pub const DEFAULT_TRANSACTION_LIMIT: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerQueryError {
    /// The address has no record on the ledger yet.
    #[error("account not found: {0}")]
    NotFound(String),

    /// The query service could not be reached or answered with a server error.
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected ledger response: {0}")]
    Unexpected(String),
}

/// Read-only view of the public ledger used by the account views.
#[async_trait]
pub trait LedgerQuery: Send + Sync {
    /// Native-asset balance of `address` as a decimal string.
    async fn get_native_balance(&self, address: &Address) -> Result<String, LedgerQueryError>;

    /// Most recent `limit` transactions of `address`, newest first.
    async fn get_recent_transactions(
        &self,
        address: &Address,
        limit: u32,
    ) -> Result<Vec<Transaction>, LedgerQueryError>;
}
