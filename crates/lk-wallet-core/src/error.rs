use lk_api_types::WalletId;
use lk_ledger_client::LedgerQueryError;
use serde::Serialize;

/// Why the transaction history of an account could not be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountErrorKind {
    NetworkFault,
    NotFoundFault,
    UnknownFault,
}

impl AccountErrorKind {
    pub fn message(&self) -> &'static str {
        match self {
            Self::NetworkFault => "Could not reach the network. Check your connection and retry.",
            Self::NotFoundFault => "This account has no activity on the network yet.",
            Self::UnknownFault => "Something went wrong while loading transactions.",
        }
    }
}

impl From<&LedgerQueryError> for AccountErrorKind {
    fn from(err: &LedgerQueryError) -> Self {
        match err {
            LedgerQueryError::NotFound(_) => Self::NotFoundFault,
            LedgerQueryError::Network(_) => Self::NetworkFault,
            LedgerQueryError::Unexpected(_) => Self::UnknownFault,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum KitError {
    #[error("unknown wallet: {0}")]
    UnknownWallet(WalletId),

    #[error("wallet {0} is not available in this environment")]
    WalletUnavailable(WalletId),

    #[error("wallet {wallet_id} failed to connect: {source}")]
    Connect {
        wallet_id: WalletId,
        #[source]
        source: anyhow::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown network '{0}' (expected mainnet, testnet or futurenet)")]
    UnknownNetwork(String),

    #[error("invalid Horizon URL '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },

    #[error("invalid {name} '{value}'")]
    InvalidNumber { name: &'static str, value: String },

    #[error("invalid bind address '{0}'")]
    InvalidBindAddr(String),
}
