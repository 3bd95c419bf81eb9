//! Wallet capability seam and the registry of installed wallet modules.

use async_trait::async_trait;
use lk_api_types::{Address, SupportedWallet, WalletId};
use std::sync::Arc;
use tracing::warn;

pub const DEFAULT_WALLET_DESCRIPTION: &str = "Connect your wallet to get started";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletKind {
    Freighter,
    Albedo,
    XBull,
    Rabet,
    Lobstr,
    Hana,
    HotWallet,
    Klever,
    WalletConnect,
    Ledger,
    Trezor,
}

impl WalletKind {
    pub const ALL: [WalletKind; 11] = [
        Self::Freighter,
        Self::Albedo,
        Self::XBull,
        Self::Rabet,
        Self::Lobstr,
        Self::Hana,
        Self::HotWallet,
        Self::Klever,
        Self::WalletConnect,
        Self::Ledger,
        Self::Trezor,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            Self::Freighter => "freighter",
            Self::Albedo => "albedo",
            Self::XBull => "xbull",
            Self::Rabet => "rabet",
            Self::Lobstr => "lobstr",
            Self::Hana => "hana",
            Self::HotWallet => "hot-wallet",
            Self::Klever => "klever",
            Self::WalletConnect => "wallet_connect",
            Self::Ledger => "ledger",
            Self::Trezor => "trezor",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Freighter => "Freighter",
            Self::Albedo => "Albedo",
            Self::XBull => "xBull",
            Self::Rabet => "Rabet",
            Self::Lobstr => "LOBSTR",
            Self::Hana => "Hana Wallet",
            Self::HotWallet => "HOT Wallet",
            Self::Klever => "Klever Wallet",
            Self::WalletConnect => "WalletConnect",
            Self::Ledger => "Ledger",
            Self::Trezor => "Trezor",
        }
    }

    /// Where the user can install the wallet.
    pub fn install_url(&self) -> &'static str {
        match self {
            Self::Freighter => "https://freighter.app",
            Self::Albedo => "https://albedo.link",
            Self::XBull => "https://xbull.app",
            Self::Rabet => "https://rabet.io",
            Self::Lobstr => "https://lobstr.co",
            Self::Hana => "https://hanawallet.io",
            Self::HotWallet => "https://hot-labs.org/wallet",
            Self::Klever => "https://klever.io",
            Self::WalletConnect => "https://walletconnect.com",
            Self::Ledger => "https://www.ledger.com",
            Self::Trezor => "https://trezor.io",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Freighter => "Official wallet of the Stellar Development Foundation",
            Self::Albedo => "Secure web wallet, no extension required",
            Self::XBull => "Secure and reliable wallet",
            Self::Rabet => "Wallet with built-in DeFi features",
            Self::Lobstr => "Friendly interface with advanced features",
            Self::Hana => "Simple and intuitive wallet",
            Self::Klever => "Multi-blockchain wallet",
            Self::WalletConnect => "Connect mobile wallets with a QR code",
            Self::Ledger => "Hardware wallet for maximum security",
            Self::Trezor => "Market-leading hardware wallet",
            Self::HotWallet => DEFAULT_WALLET_DESCRIPTION,
        }
    }

    /// Case-insensitive lookup by wallet id.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.to_ascii_lowercase();
        match id.as_str() {
            "walletconnect" => Some(Self::WalletConnect),
            other => Self::ALL.into_iter().find(|kind| kind.id() == other),
        }
    }
}

/// Short description shown under a wallet's name in the picker.
pub fn wallet_description(id: &WalletId) -> &'static str {
    WalletKind::from_id(id.as_str())
        .map(|kind| kind.description())
        .unwrap_or(DEFAULT_WALLET_DESCRIPTION)
}

/// Static part of a wallet module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletDescriptor {
    pub id: WalletId,
    pub name: String,
    pub icon: String,
    pub url: String,
    pub is_platform_wrapper: bool,
}

impl WalletDescriptor {
    pub fn for_kind(kind: WalletKind) -> Self {
        Self {
            id: WalletId::from(kind.id()),
            name: kind.name().to_owned(),
            icon: String::new(),
            url: kind.install_url().to_owned(),
            is_platform_wrapper: false,
        }
    }

    pub fn snapshot(&self, is_available: bool) -> SupportedWallet {
        SupportedWallet {
            id: self.id.clone(),
            name: self.name.clone(),
            icon: self.icon.clone(),
            url: self.url.clone(),
            is_available,
            is_platform_wrapper: self.is_platform_wrapper,
        }
    }
}

/// A signing wallet the kit can offer.
#[async_trait]
pub trait WalletModule: Send + Sync {
    fn descriptor(&self) -> &WalletDescriptor;

    /// Whether the wallet can be used in the current environment.
    async fn is_available(&self) -> bool;

    /// Asks the wallet for the account to connect.
    async fn connect(&self) -> anyhow::Result<Address>;
}

/// Installed wallet modules, in the order the host registered them.
#[derive(Default, Clone)]
pub struct WalletRegistry {
    modules: Vec<Arc<dyn WalletModule>>,
}

impl WalletRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a module. A module with an id already registered replaces the
    /// earlier one in place.
    pub fn register(&mut self, module: Arc<dyn WalletModule>) {
        let id = module.descriptor().id.clone();
        match self.modules.iter_mut().find(|m| m.descriptor().id == id) {
            Some(slot) => {
                warn!("wallet module {} registered twice; keeping the latest", id);
                *slot = module;
            }
            None => self.modules.push(module),
        }
    }

    pub fn module(&self, id: &WalletId) -> Option<Arc<dyn WalletModule>> {
        self.modules
            .iter()
            .find(|module| &module.descriptor().id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Snapshots every module with its current availability.
    pub async fn supported_wallets(&self) -> Vec<SupportedWallet> {
        let mut wallets = Vec::with_capacity(self.modules.len());
        for module in &self.modules {
            let available = module.is_available().await;
            wallets.push(module.descriptor().snapshot(available));
        }
        wallets
    }
}
