use serde::{Deserialize, Serialize};
use std::fmt;

pub mod theme;

pub use theme::{ButtonTheme, ModalTheme, ThemeVariant};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct WalletId(pub String);

impl WalletId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for WalletId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Public account identifier of a connected signer (a `G...` key on Stellar).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compact label used by the connect button: first 4 and last 6 characters.
    pub fn short_label(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= 10 {
            return self.0.clone();
        }
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 6..].iter().collect();
        format!("{head}....{tail}")
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Address {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Display snapshot of one signing wallet, as supplied by the host application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SupportedWallet {
    pub id: WalletId,
    pub name: String,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub url: String,
    pub is_available: bool,
    #[serde(default)]
    pub is_platform_wrapper: bool,
}

/// One entry of an account's transaction history, newest first when listed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: String,
    pub hash: String,
    #[serde(default)]
    pub ledger: u64,
    pub created_at: String,
    pub source_account: String,
    #[serde(default)]
    pub fee_charged: String,
    #[serde(default)]
    pub operation_count: u32,
    #[serde(default = "default_successful")]
    pub successful: bool,
    #[serde(default)]
    pub memo: Option<String>,
}

fn default_successful() -> bool {
    true
}

/// A selectable Stellar network.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NetworkInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub horizon_url: String,
    pub network_passphrase: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NetworkChange {
    pub network_id: String,
    pub network_name: String,
    pub horizon_url: String,
    pub network_passphrase: String,
    pub is_connected: bool,
}

/// Events emitted by kit controllers to the host application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "detail", rename_all = "kebab-case")]
pub enum KitEvent {
    WalletSelected(SupportedWallet),
    /// An unavailable wallet was picked; the host should open its install page.
    InstallRequested { wallet_id: WalletId, url: String },
    AddressDisconnected,
    ModalClosed,
    NetworkChanged(NetworkChange),
    ConnectClicked,
    ReviewTransactionClicked,
}
