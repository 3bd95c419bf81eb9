//! Shared connection state.
//!
//! A [`ConnectionStore`] is created once by the host and cloned into every
//! controller that needs it. Each slot holds one value; subscribers get the
//! current value immediately, then every later change in the order it was
//! applied. Setting a slot to the value it already holds emits nothing.

use lk_api_types::{Address, ButtonTheme, ModalTheme, SupportedWallet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tracing::debug;
use url::Url;

struct SlotInner<T> {
    value: T,
    subscribers: Vec<mpsc::UnboundedSender<T>>,
    closed: bool,
}

/// One observable value.
///
/// The lock is held while a new value is fanned out, so two writers can never
/// interleave their deliveries and no reader sees half of an update.
pub struct Slot<T> {
    inner: Mutex<SlotInner<T>>,
}

impl<T> Slot<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(SlotInner {
                value,
                subscribers: Vec::new(),
                closed: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotInner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    pub fn subscribe(&self) -> Subscription<T> {
        let mut inner = self.lock();
        let (tx, rx) = mpsc::unbounded_channel();
        let _ = tx.send(inner.value.clone());
        if !inner.closed {
            inner.subscribers.push(tx);
        }
        Subscription { rx }
    }

    /// Replaces the value. Returns `false` when it was already equal.
    pub fn set(&self, value: T) -> bool {
        let mut inner = self.lock();
        if inner.value == value {
            return false;
        }
        inner.value = value;
        let SlotInner {
            value, subscribers, ..
        } = &mut *inner;
        subscribers.retain(|tx| tx.send(value.clone()).is_ok());
        true
    }

    /// Ends every subscription. The value stays readable.
    pub fn close(&self) {
        let mut inner = self.lock();
        inner.closed = true;
        inner.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|tx| !tx.is_closed());
        inner.subscribers.len()
    }
}

/// Stream of values from a [`Slot`], starting with the value current at
/// subscription time.
#[derive(Debug)]
pub struct Subscription<T> {
    rx: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    /// Next value, or `None` once the store has been shut down.
    pub async fn next(&mut self) -> Option<T> {
        self.rx.recv().await
    }

    /// Next value if one is already queued.
    pub fn try_next(&mut self) -> Option<T> {
        self.rx.try_recv().ok()
    }
}

struct StoreInner {
    active_address: Slot<Option<Address>>,
    allowed_wallets: Slot<Vec<SupportedWallet>>,
    modal_theme: Slot<Option<ModalTheme>>,
    button_theme: Slot<Option<ButtonTheme>>,
    network_endpoint: Slot<Option<Url>>,
}

#[derive(Clone)]
pub struct ConnectionStore {
    inner: Arc<StoreInner>,
}

impl Default for ConnectionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionStore {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(StoreInner {
                active_address: Slot::new(None),
                allowed_wallets: Slot::new(Vec::new()),
                modal_theme: Slot::new(None),
                button_theme: Slot::new(None),
                network_endpoint: Slot::new(None),
            }),
        }
    }

    // ── Active address ──

    pub fn active_address(&self) -> Option<Address> {
        self.inner.active_address.get()
    }

    pub fn observe_active_address(&self) -> Subscription<Option<Address>> {
        self.inner.active_address.subscribe()
    }

    pub fn set_active_address(&self, address: Address) {
        if self.inner.active_address.set(Some(address)) {
            debug!("active address changed");
        }
    }

    pub fn remove_address(&self) {
        if self.inner.active_address.set(None) {
            debug!("active address removed");
        }
    }

    // ── Allowed wallets ──

    pub fn allowed_wallets(&self) -> Vec<SupportedWallet> {
        self.inner.allowed_wallets.get()
    }

    pub fn observe_allowed_wallets(&self) -> Subscription<Vec<SupportedWallet>> {
        self.inner.allowed_wallets.subscribe()
    }

    pub fn set_allowed_wallets(&self, wallets: Vec<SupportedWallet>) {
        self.inner.allowed_wallets.set(wallets);
    }

    // ── Themes ──

    pub fn modal_theme(&self) -> Option<ModalTheme> {
        self.inner.modal_theme.get()
    }

    pub fn observe_modal_theme(&self) -> Subscription<Option<ModalTheme>> {
        self.inner.modal_theme.subscribe()
    }

    pub fn set_modal_theme(&self, theme: Option<ModalTheme>) {
        self.inner.modal_theme.set(theme);
    }

    pub fn button_theme(&self) -> Option<ButtonTheme> {
        self.inner.button_theme.get()
    }

    pub fn observe_button_theme(&self) -> Subscription<Option<ButtonTheme>> {
        self.inner.button_theme.subscribe()
    }

    pub fn set_button_theme(&self, theme: Option<ButtonTheme>) {
        self.inner.button_theme.set(theme);
    }

    // ── Network endpoint ──

    pub fn network_endpoint(&self) -> Option<Url> {
        self.inner.network_endpoint.get()
    }

    pub fn observe_network_endpoint(&self) -> Subscription<Option<Url>> {
        self.inner.network_endpoint.subscribe()
    }

    pub fn set_network_endpoint(&self, endpoint: Option<Url>) {
        self.inner.network_endpoint.set(endpoint);
    }

    /// Ends every open subscription; pipelines observing the store stop.
    pub fn shutdown(&self) {
        self.inner.active_address.close();
        self.inner.allowed_wallets.close();
        self.inner.modal_theme.close();
        self.inner.button_theme.close();
        self.inner.network_endpoint.close();
    }

    pub fn address_subscriber_count(&self) -> usize {
        self.inner.active_address.subscriber_count()
    }
}
