//! Connect button controller.

use crate::events::EventBus;
use crate::pipeline::{AccountPipeline, AccountSnapshot};
use crate::store::ConnectionStore;
use crate::timer::TimerHandle;
use anyhow::{Context, anyhow};
use async_trait::async_trait;
use lk_api_types::KitEvent;
use lk_ledger_client::LedgerQuery;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::info;

pub const COPY_FEEDBACK_DELAY: Duration = Duration::from_millis(3000);

/// Destination of "copy address".
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone)]
pub struct ButtonOptions {
    pub button_text: String,
}

impl Default for ButtonOptions {
    fn default() -> Self {
        Self {
            button_text: "Connect".to_owned(),
        }
    }
}

#[derive(Default)]
struct ButtonState {
    dropdown_open: bool,
    copied: bool,
    copy_timer: TimerHandle,
    account: Option<AccountPipeline>,
}

struct ButtonInner {
    store: ConnectionStore,
    events: EventBus,
    ledger: Arc<dyn LedgerQuery>,
    transaction_limit: u32,
    clipboard: Arc<dyn Clipboard>,
    options: ButtonOptions,
    state: Mutex<ButtonState>,
}

#[derive(Clone)]
pub struct ConnectButton {
    inner: Arc<ButtonInner>,
}

impl ConnectButton {
    pub fn new(
        store: ConnectionStore,
        events: EventBus,
        ledger: Arc<dyn LedgerQuery>,
        transaction_limit: u32,
        clipboard: Arc<dyn Clipboard>,
        options: ButtonOptions,
    ) -> Self {
        Self {
            inner: Arc::new(ButtonInner {
                store,
                events,
                ledger,
                transaction_limit,
                clipboard,
                options,
                state: Mutex::new(ButtonState::default()),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ButtonState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Button caption: the shortened address when connected.
    pub fn label(&self) -> String {
        match self.inner.store.active_address() {
            Some(address) => address.short_label(),
            None => self.inner.options.button_text.clone(),
        }
    }

    pub fn click(&self) {
        if self.inner.store.active_address().is_some() {
            let mut state = self.state();
            state.dropdown_open = !state.dropdown_open;
        } else {
            self.inner.events.emit(KitEvent::ConnectClicked);
        }
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.state().dropdown_open
    }

    pub fn close_dropdown(&self) {
        self.state().dropdown_open = false;
    }

    pub fn disconnect(&self) {
        self.close_dropdown();
        self.inner.store.remove_address();
        info!("address disconnected");
        self.inner.events.emit(KitEvent::AddressDisconnected);
    }

    pub async fn copy_address(&self) -> anyhow::Result<()> {
        let address = self
            .inner
            .store
            .active_address()
            .ok_or_else(|| anyhow!("no connected address to copy"))?;
        self.inner
            .clipboard
            .write_text(address.as_str())
            .await
            .context("failed to copy address")?;

        let mut state = self.state();
        state.copied = true;
        let button = Arc::downgrade(&self.inner);
        state.copy_timer.schedule(COPY_FEEDBACK_DELAY, async move {
            if let Some(inner) = button.upgrade() {
                ConnectButton { inner }.state().copied = false;
            }
        });
        Ok(())
    }

    pub fn is_copied(&self) -> bool {
        self.state().copied
    }

    /// Starts following the active account. Attaching twice keeps the
    /// running pipeline.
    pub fn attach(&self) {
        let mut state = self.state();
        if state.account.is_none() {
            state.account = Some(AccountPipeline::spawn(
                &self.inner.store,
                self.inner.ledger.clone(),
                self.inner.transaction_limit,
            ));
        }
    }

    pub fn detach(&self) {
        if let Some(pipeline) = self.state().account.take() {
            pipeline.detach();
        }
    }

    pub fn account(&self) -> Option<AccountSnapshot> {
        self.state().account.as_ref().map(AccountPipeline::snapshot)
    }

    pub fn retry_account(&self) {
        if let Some(pipeline) = self.state().account.as_ref() {
            pipeline.retry();
        }
    }
}
