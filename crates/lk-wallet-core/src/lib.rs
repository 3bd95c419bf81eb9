//! Connection state, wallet selection and account views of the wallet kit.
//!
//! Everything hangs off one [`ConnectionStore`]; [`WalletKit`] wires the
//! store, the usage ledger and the wallet registry into the controllers a
//! host needs.

pub mod button;
pub mod config;
pub mod error;
pub mod events;
pub mod modal;
pub mod network;
pub mod pipeline;
pub mod ranking;
pub mod review;
pub mod store;
pub mod timer;
pub mod wallets;

#[cfg(test)]
mod testing;

pub use button::{ButtonOptions, Clipboard, ConnectButton};
pub use config::KitConfig;
pub use error::{AccountErrorKind, ConfigError, KitError};
pub use events::EventBus;
pub use modal::{ModalOptions, MountOutcome, PickOutcome, TransitionPhase, WalletModal};
pub use network::NetworkSelector;
pub use pipeline::{AccountPipeline, AccountSnapshot};
pub use review::{ReviewTransactionButton, ReviewTransactionModal};
pub use store::{ConnectionStore, Subscription};
pub use wallets::{WalletDescriptor, WalletKind, WalletModule, WalletRegistry};

use lk_api_types::{Address, KitEvent, SupportedWallet, WalletId};
use lk_ledger_client::LedgerQuery;
use lk_storage::UsageLedger;
use std::sync::Arc;
use tracing::info;

/// One kit instance: shared state plus the controllers built on it.
#[derive(Clone)]
pub struct WalletKit {
    store: ConnectionStore,
    events: EventBus,
    ledger: UsageLedger,
    registry: WalletRegistry,
    query: Arc<dyn LedgerQuery>,
    transaction_limit: u32,
    modal: WalletModal,
    network: NetworkSelector,
}

impl WalletKit {
    /// `store` is usually fresh; the host may have handed clones of it to
    /// collaborators such as a ledger client that follows its endpoint.
    pub fn new(
        config: &KitConfig,
        store: ConnectionStore,
        ledger: UsageLedger,
        registry: WalletRegistry,
        query: Arc<dyn LedgerQuery>,
    ) -> Self {
        let events = EventBus::new();
        let modal = WalletModal::new(
            store.clone(),
            ledger.clone(),
            events.clone(),
            ModalOptions::default(),
        );
        let network = NetworkSelector::new(
            store.clone(),
            events.clone(),
            config.network.clone(),
            config.horizon_url.clone(),
        );
        Self {
            store,
            events,
            ledger,
            registry,
            query,
            transaction_limit: config.transaction_limit,
            modal,
            network,
        }
    }

    pub fn store(&self) -> &ConnectionStore {
        &self.store
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn ledger(&self) -> &UsageLedger {
        &self.ledger
    }

    pub fn registry(&self) -> &WalletRegistry {
        &self.registry
    }

    pub fn modal(&self) -> &WalletModal {
        &self.modal
    }

    pub fn network(&self) -> &NetworkSelector {
        &self.network
    }

    pub fn set_allowed_wallets(&self, wallets: Vec<SupportedWallet>) {
        self.store.set_allowed_wallets(wallets);
    }

    /// Re-reads availability from every registered module into the store.
    pub async fn refresh_wallets(&self) -> Vec<SupportedWallet> {
        let wallets = self.registry.supported_wallets().await;
        self.store.set_allowed_wallets(wallets.clone());
        wallets
    }

    pub fn account_pipeline(&self) -> AccountPipeline {
        AccountPipeline::spawn(&self.store, self.query.clone(), self.transaction_limit)
    }

    pub fn connect_button(&self, clipboard: Arc<dyn Clipboard>) -> ConnectButton {
        ConnectButton::new(
            self.store.clone(),
            self.events.clone(),
            self.query.clone(),
            self.transaction_limit,
            clipboard,
            ButtonOptions::default(),
        )
    }

    pub fn review_button(&self) -> ReviewTransactionButton {
        ReviewTransactionButton::new(self.events.clone())
    }

    pub fn review_modal(&self) -> ReviewTransactionModal {
        ReviewTransactionModal::new(self.events.clone())
    }

    /// Connects through a registered wallet module and makes its account the
    /// active address. The wallet is then picked on the modal, which records
    /// the use and announces the selection.
    pub async fn connect(&self, wallet_id: &WalletId) -> Result<Address, KitError> {
        let module = self
            .registry
            .module(wallet_id)
            .ok_or_else(|| KitError::UnknownWallet(wallet_id.clone()))?;
        if !module.is_available().await {
            return Err(KitError::WalletUnavailable(wallet_id.clone()));
        }

        let address = module.connect().await.map_err(|source| KitError::Connect {
            wallet_id: wallet_id.clone(),
            source,
        })?;

        self.store.set_active_address(address.clone());
        info!("connected {} through {}", address.short_label(), wallet_id);
        self.modal.pick(module.descriptor().snapshot(true));
        self.modal.finish_transition().await;
        Ok(address)
    }

    /// Records a connection made outside this process, for instance by a
    /// browser extension, against one of the allowed wallets.
    pub async fn connect_with_address(&self, wallet_id: &WalletId, address: Address) -> Result<(), KitError> {
        let wallet = self
            .store
            .allowed_wallets()
            .into_iter()
            .find(|wallet| &wallet.id == wallet_id)
            .ok_or_else(|| KitError::UnknownWallet(wallet_id.clone()))?;
        if !wallet.is_available {
            return Err(KitError::WalletUnavailable(wallet_id.clone()));
        }

        self.ledger.record_use(wallet_id).await;
        self.store.set_active_address(address);
        Ok(())
    }

    pub fn disconnect(&self) {
        self.store.remove_address();
        self.events.emit(KitEvent::AddressDisconnected);
    }

    /// Stops every pipeline observing this kit.
    pub fn shutdown(&self) {
        self.store.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modal::{AUTO_PICK_DELAY, TRANSITION_DELAY};
    use crate::testing::{FakeWallet, ScriptedLedger, wallet};
    use lk_storage::InMemoryStore;
    use tokio::sync::broadcast;

    fn kit(modules: Vec<Arc<FakeWallet>>) -> (WalletKit, broadcast::Receiver<KitEvent>) {
        let config = KitConfig::from_lookup(|_| None).expect("default config");
        let ledger = UsageLedger::new(Arc::new(InMemoryStore::default()));
        let mut registry = WalletRegistry::new();
        for module in modules {
            registry.register(module);
        }
        let kit = WalletKit::new(
            &config,
            ConnectionStore::new(),
            ledger,
            registry,
            Arc::new(ScriptedLedger::default()),
        );
        let rx = kit.events().subscribe();
        (kit, rx)
    }

    #[tokio::test]
    async fn connect_sets_address_and_records_use() {
        let albedo = Arc::new(FakeWallet::new(WalletKind::Albedo, true));
        let freighter = Arc::new(FakeWallet::new(WalletKind::Freighter, true).connecting_as("GFREIGHTER"));
        let (kit, mut rx) = kit(vec![albedo.clone(), freighter.clone()]);
        kit.modal().open();

        let address = kit.connect(&WalletId::from("freighter")).await.expect("connect");
        assert_eq!(address, Address::from("GFREIGHTER"));
        assert_eq!(freighter.connects(), 1);
        assert_eq!(albedo.connects(), 0);
        assert!(!kit.modal().is_visible());
        assert_eq!(kit.store().active_address(), Some(address));
        assert_eq!(kit.ledger().read().await.ids(), &[WalletId::from("freighter")]);

        let Ok(KitEvent::WalletSelected(selected)) = rx.try_recv() else {
            panic!("expected wallet-selected");
        };
        assert_eq!(selected.id.as_str(), "freighter");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn connect_rejects_unknown_and_unavailable_wallets() {
        let rabet = Arc::new(FakeWallet::new(WalletKind::Rabet, false));
        let (kit, _rx) = kit(vec![rabet.clone()]);

        let unknown = kit.connect(&WalletId::from("lobstr")).await;
        assert!(matches!(unknown, Err(KitError::UnknownWallet(_))));
        let unavailable = kit.connect(&WalletId::from("rabet")).await;
        assert!(matches!(unavailable, Err(KitError::WalletUnavailable(_))));
        assert_eq!(rabet.connects(), 0);
        assert_eq!(kit.store().active_address(), None);
    }

    #[tokio::test]
    async fn refused_connection_leaves_state_untouched() {
        let (kit, mut rx) = kit(vec![Arc::new(FakeWallet::new(WalletKind::XBull, true).refusing("user rejected"))]);

        let result = kit.connect(&WalletId::from("xbull")).await;
        assert!(matches!(result, Err(KitError::Connect { .. })));
        assert_eq!(kit.store().active_address(), None);
        assert!(kit.ledger().read().await.is_empty());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn refresh_publishes_registry_snapshot() {
        let (kit, _rx) = kit(vec![
            Arc::new(FakeWallet::new(WalletKind::Hana, false)),
            Arc::new(FakeWallet::new(WalletKind::Klever, true)),
        ]);
        let wallets = kit.refresh_wallets().await;
        assert_eq!(kit.store().allowed_wallets(), wallets);
        assert!(!kit.modal().is_bypassed());

        let ids: Vec<String> = kit.modal().sorted_wallets().await.into_iter().map(|w| w.id.0).collect();
        assert_eq!(ids, vec!["klever", "hana"]);
    }

    #[tokio::test(start_paused = true)]
    async fn registered_platform_wrapper_is_auto_picked() {
        let (kit, mut rx) = kit(vec![
            Arc::new(FakeWallet::new(WalletKind::Albedo, true)),
            Arc::new(FakeWallet::new(WalletKind::Hana, true).platform_wrapper()),
        ]);
        kit.refresh_wallets().await;
        assert!(kit.modal().is_bypassed());

        let MountOutcome::AutoPick(wrapper) = kit.modal().mount().await else {
            panic!("expected auto-pick");
        };
        assert_eq!(wrapper.id.as_str(), "hana");

        tokio::time::sleep(AUTO_PICK_DELAY + TRANSITION_DELAY).await;
        assert_eq!(rx.recv().await.ok(), Some(KitEvent::WalletSelected(wrapper)));
        assert_eq!(kit.ledger().read().await.ids(), &[WalletId::from("hana")]);
    }

    #[tokio::test]
    async fn relayed_connection_checks_allowed_list() {
        let (kit, mut rx) = kit(Vec::new());
        kit.set_allowed_wallets(vec![wallet("freighter", true), wallet("albedo", false)]);

        kit.connect_with_address(&WalletId::from("freighter"), Address::from("GRELAYED"))
            .await
            .expect("relayed connect");
        assert_eq!(kit.store().active_address(), Some(Address::from("GRELAYED")));

        let refused = kit
            .connect_with_address(&WalletId::from("albedo"), Address::from("GOTHER"))
            .await;
        assert!(matches!(refused, Err(KitError::WalletUnavailable(_))));

        kit.disconnect();
        assert_eq!(kit.store().active_address(), None);
        assert_eq!(rx.try_recv().ok(), Some(KitEvent::AddressDisconnected));
    }

    #[tokio::test]
    async fn kit_starts_on_configured_network() {
        let (kit, _rx) = kit(Vec::new());
        assert_eq!(kit.network().current().id, network::TESTNET);
        assert_eq!(
            kit.store().network_endpoint().map(String::from).as_deref(),
            Some("https://horizon-testnet.stellar.org/")
        );
    }
}
