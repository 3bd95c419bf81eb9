//! Network selector: the fixed catalogue of Stellar networks and the
//! controller that switches the store's Horizon endpoint between them.

use crate::events::EventBus;
use crate::store::ConnectionStore;
use lk_api_types::{KitEvent, NetworkChange, NetworkInfo};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};
use url::Url;

pub const MAINNET: &str = "mainnet";
pub const TESTNET: &str = "testnet";
pub const FUTURENET: &str = "futurenet";

pub fn catalogue() -> Vec<NetworkInfo> {
    vec![
        network(
            MAINNET,
            "Stellar Mainnet",
            "Production network",
            "https://horizon.stellar.org",
            "Public Global Stellar Network ; September 2015",
        ),
        network(
            TESTNET,
            "Stellar Testnet",
            "Test environment",
            "https://horizon-testnet.stellar.org",
            "Test SDF Network ; September 2015",
        ),
        network(
            FUTURENET,
            "Stellar Futurenet",
            "Preview features",
            "https://horizon-futurenet.stellar.org",
            "Test SDF Future Network ; October 2022",
        ),
    ]
}

fn network(id: &str, name: &str, description: &str, horizon_url: &str, passphrase: &str) -> NetworkInfo {
    NetworkInfo {
        id: id.to_owned(),
        name: name.to_owned(),
        description: description.to_owned(),
        horizon_url: horizon_url.to_owned(),
        network_passphrase: passphrase.to_owned(),
    }
}

pub fn find_network(id: &str) -> Option<NetworkInfo> {
    catalogue().into_iter().find(|network| network.id == id)
}

struct SelectorState {
    current: NetworkInfo,
    dropdown_open: bool,
}

#[derive(Clone)]
pub struct NetworkSelector {
    store: ConnectionStore,
    events: EventBus,
    state: Arc<Mutex<SelectorState>>,
}

impl NetworkSelector {
    /// Starts on `initial` and points the store at `endpoint`, which is
    /// usually the network's own Horizon URL.
    pub fn new(store: ConnectionStore, events: EventBus, initial: NetworkInfo, endpoint: Url) -> Self {
        store.set_network_endpoint(Some(endpoint));
        Self {
            store,
            events,
            state: Arc::new(Mutex::new(SelectorState {
                current: initial,
                dropdown_open: false,
            })),
        }
    }

    fn state(&self) -> MutexGuard<'_, SelectorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn networks(&self) -> Vec<NetworkInfo> {
        catalogue()
    }

    pub fn current(&self) -> NetworkInfo {
        self.state().current.clone()
    }

    pub fn toggle(&self) {
        let mut state = self.state();
        state.dropdown_open = !state.dropdown_open;
    }

    pub fn close(&self) {
        self.state().dropdown_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.state().dropdown_open
    }

    /// Switches to the network with `id`. Unknown ids leave everything as it
    /// was and return `None`.
    pub fn select(&self, id: &str) -> Option<NetworkInfo> {
        let Some(network) = find_network(id) else {
            warn!("ignoring unknown network '{}'", id);
            return None;
        };
        let endpoint = match Url::parse(&network.horizon_url) {
            Ok(url) => url,
            Err(err) => {
                warn!("network {} has an unusable Horizon URL: {}", id, err);
                return None;
            }
        };

        {
            let mut state = self.state();
            state.current = network.clone();
            state.dropdown_open = false;
        }
        self.store.set_network_endpoint(Some(endpoint));
        info!("switched to {}", network.name);

        self.events.emit(KitEvent::NetworkChanged(NetworkChange {
            network_id: network.id.clone(),
            network_name: network.name.clone(),
            horizon_url: network.horizon_url.clone(),
            network_passphrase: network.network_passphrase.clone(),
            is_connected: true,
        }));
        Some(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector() -> (NetworkSelector, ConnectionStore, tokio::sync::broadcast::Receiver<KitEvent>) {
        let store = ConnectionStore::new();
        let events = EventBus::new();
        let rx = events.subscribe();
        let testnet = find_network(TESTNET).expect("testnet in catalogue");
        let endpoint = Url::parse(&testnet.horizon_url).expect("testnet url");
        (NetworkSelector::new(store.clone(), events, testnet, endpoint), store, rx)
    }

    #[test]
    fn starts_on_initial_network() {
        let (selector, store, _rx) = selector();
        assert_eq!(selector.current().id, TESTNET);
        assert_eq!(
            store.network_endpoint().map(String::from).as_deref(),
            Some("https://horizon-testnet.stellar.org/")
        );
        assert_eq!(selector.networks().len(), 3);
    }

    #[test]
    fn selecting_switches_endpoint_and_notifies() {
        let (selector, store, mut rx) = selector();
        selector.toggle();
        assert!(selector.is_open());

        let chosen = selector.select(MAINNET).expect("mainnet");
        assert_eq!(chosen.name, "Stellar Mainnet");
        assert!(!selector.is_open());
        assert_eq!(
            store.network_endpoint().map(String::from).as_deref(),
            Some("https://horizon.stellar.org/")
        );

        let Ok(KitEvent::NetworkChanged(change)) = rx.try_recv() else {
            panic!("expected a network-changed event");
        };
        assert_eq!(change.network_id, MAINNET);
        assert_eq!(change.network_passphrase, "Public Global Stellar Network ; September 2015");
        assert!(change.is_connected);
    }

    #[test]
    fn unknown_network_is_ignored() {
        let (selector, store, mut rx) = selector();
        selector.toggle();

        assert_eq!(selector.select("devnet"), None);
        assert_eq!(selector.current().id, TESTNET);
        assert!(selector.is_open());
        assert_eq!(
            store.network_endpoint().map(String::from).as_deref(),
            Some("https://horizon-testnet.stellar.org/")
        );
        assert!(rx.try_recv().is_err());
    }
}
