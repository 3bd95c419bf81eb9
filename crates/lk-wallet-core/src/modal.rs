//! Wallet picker controller.
//!
//! Closing and selecting both run through a short transition: the modal
//! enters `Closing`, and the pending action is applied when the transition
//! finishes, either on its own timer or through [`WalletModal::finish_transition`].
//! Each new transition bumps an epoch so a timer armed for an earlier one
//! does nothing when it fires.
//!
//! A selection, once made, is never dropped: closing or reopening while it is
//! pending only changes what happens around it.

use crate::events::EventBus;
use crate::ranking::{platform_wrapper, rank_wallets};
use crate::store::ConnectionStore;
use crate::timer::TimerHandle;
use lk_api_types::{KitEvent, SupportedWallet};
use lk_storage::UsageLedger;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tracing::{debug, info};

pub const TRANSITION_DELAY: Duration = Duration::from_millis(280);
pub const AUTO_PICK_DELAY: Duration = Duration::from_millis(10);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionPhase {
    Idle,
    Closing,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    /// The wallet is not installed; the host was asked to open its page.
    InstallRequested,
    Selecting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MountOutcome {
    /// The list is never shown; the platform wrapper is picked shortly.
    AutoPick(SupportedWallet),
    ShowList(Vec<SupportedWallet>),
}

#[derive(Debug, Clone)]
pub struct ModalOptions {
    pub title: String,
    pub not_available_text: String,
    /// Leave visibility to the host: finishing a transition does not hide
    /// the modal.
    pub ignore_show_status: bool,
}

impl Default for ModalOptions {
    fn default() -> Self {
        Self {
            title: "Choose Your Wallet".to_owned(),
            not_available_text: "Not available".to_owned(),
            ignore_show_status: false,
        }
    }
}

enum PendingAction {
    Close,
    Select(SupportedWallet),
}

struct ModalState {
    visible: bool,
    phase: TransitionPhase,
    epoch: u64,
    pending: Vec<PendingAction>,
    auto_picked: bool,
    transition_timer: TimerHandle,
    mount_timer: TimerHandle,
}

struct ModalInner {
    store: ConnectionStore,
    ledger: UsageLedger,
    events: EventBus,
    options: ModalOptions,
    state: Mutex<ModalState>,
}

#[derive(Clone)]
pub struct WalletModal {
    inner: Arc<ModalInner>,
}

impl WalletModal {
    pub fn new(store: ConnectionStore, ledger: UsageLedger, events: EventBus, options: ModalOptions) -> Self {
        Self {
            inner: Arc::new(ModalInner {
                store,
                ledger,
                events,
                options,
                state: Mutex::new(ModalState {
                    visible: false,
                    phase: TransitionPhase::Idle,
                    epoch: 0,
                    pending: Vec::new(),
                    auto_picked: false,
                    transition_timer: TimerHandle::new(),
                    mount_timer: TimerHandle::new(),
                }),
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ModalState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn options(&self) -> &ModalOptions {
        &self.inner.options
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    pub fn phase(&self) -> TransitionPhase {
        self.state().phase
    }

    /// Shows the modal, abandoning a pending close. A pending selection
    /// still completes.
    pub fn open(&self) {
        let mut state = self.state();
        state.pending.retain(|action| !matches!(action, PendingAction::Close));
        state.visible = true;
        if state.pending.is_empty() {
            state.transition_timer.cancel();
            state.epoch += 1;
            state.phase = TransitionPhase::Idle;
        }
    }

    pub fn close(&self) {
        let mut state = self.state();
        if state.pending.iter().any(|action| matches!(action, PendingAction::Close)) {
            return;
        }
        if state.pending.is_empty() {
            self.begin_transition(&mut state, PendingAction::Close);
        } else {
            // Rides on the selection's transition.
            state.pending.push(PendingAction::Close);
        }
    }

    pub fn pick(&self, wallet: SupportedWallet) -> PickOutcome {
        if !wallet.is_available {
            info!("wallet {} is not available, requesting install", wallet.id);
            self.inner.events.emit(KitEvent::InstallRequested {
                wallet_id: wallet.id,
                url: wallet.url,
            });
            return PickOutcome::InstallRequested;
        }

        let mut state = self.state();
        state.pending.retain(|action| !matches!(action, PendingAction::Close));
        self.begin_transition(&mut state, PendingAction::Select(wallet));
        PickOutcome::Selecting
    }

    /// Completes the running transition now instead of waiting for its timer.
    pub async fn finish_transition(&self) {
        let actions = {
            let mut state = self.state();
            state.transition_timer.cancel();
            self.take_pending(&mut state)
        };
        self.apply(actions).await;
    }

    /// Wallets in display order. Reads the usage ledger on every call, so a
    /// pick shows up the next time the list is rendered.
    pub async fn sorted_wallets(&self) -> Vec<SupportedWallet> {
        let usage = self.inner.ledger.read().await;
        rank_wallets(&self.inner.store.allowed_wallets(), &usage)
    }

    /// Whether the list is skipped in favour of a platform wrapper.
    pub fn is_bypassed(&self) -> bool {
        platform_wrapper(&self.inner.store.allowed_wallets()).is_some()
    }

    /// Called when the modal is attached to the page.
    pub async fn mount(&self) -> MountOutcome {
        let allowed = self.inner.store.allowed_wallets();
        if let Some(wrapper) = platform_wrapper(&allowed).cloned() {
            let mut state = self.state();
            if !state.auto_picked && !state.mount_timer.is_pending() {
                let modal = Arc::downgrade(&self.inner);
                let wallet = wrapper.clone();
                state.mount_timer.schedule(AUTO_PICK_DELAY, async move {
                    let Some(modal) = upgrade(&modal) else {
                        return;
                    };
                    {
                        let mut state = modal.state();
                        if state.auto_picked {
                            return;
                        }
                        state.auto_picked = true;
                    }
                    debug!("auto-picking platform wrapper {}", wallet.id);
                    modal.pick(wallet);
                });
            }
            return MountOutcome::AutoPick(wrapper);
        }
        MountOutcome::ShowList(self.sorted_wallets().await)
    }

    /// Detaches the modal. An auto-pick that has not run yet is dropped and
    /// scheduled again on the next mount.
    pub fn unmount(&self) {
        self.state().mount_timer.cancel();
    }

    fn begin_transition(&self, state: &mut ModalState, action: PendingAction) {
        state.phase = TransitionPhase::Closing;
        state.pending.push(action);
        state.epoch += 1;

        let epoch = state.epoch;
        let modal = Arc::downgrade(&self.inner);
        state.transition_timer.schedule(TRANSITION_DELAY, async move {
            let Some(modal) = upgrade(&modal) else {
                return;
            };
            let actions = {
                let mut state = modal.state();
                if state.epoch != epoch {
                    return;
                }
                modal.take_pending(&mut state)
            };
            // Applied on its own task: re-arming this timer must not cut it short.
            if !actions.is_empty() {
                tokio::spawn(async move { modal.apply(actions).await });
            }
        });
    }

    fn take_pending(&self, state: &mut ModalState) -> Vec<PendingAction> {
        let actions = std::mem::take(&mut state.pending);
        if !actions.is_empty() {
            state.phase = TransitionPhase::Closed;
            if !self.inner.options.ignore_show_status {
                state.visible = false;
            }
        }
        actions
    }

    async fn apply(&self, actions: Vec<PendingAction>) {
        for action in actions {
            match action {
                PendingAction::Close => {
                    self.inner.events.emit(KitEvent::ModalClosed);
                }
                PendingAction::Select(wallet) => {
                    self.inner.ledger.record_use(&wallet.id).await;
                    info!("wallet {} selected", wallet.id);
                    self.inner.events.emit(KitEvent::WalletSelected(wallet));
                }
            }
        }
    }
}

fn upgrade(inner: &Weak<ModalInner>) -> Option<WalletModal> {
    inner.upgrade().map(|inner| WalletModal { inner })
}
