//! Transaction review button and modal.

use crate::events::EventBus;
use lk_api_types::KitEvent;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

#[derive(Clone)]
pub struct ReviewTransactionButton {
    events: EventBus,
    text: String,
}

impl ReviewTransactionButton {
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            text: "Review Transaction".to_owned(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn label(&self) -> &str {
        &self.text
    }

    pub fn click(&self) {
        self.events.emit(KitEvent::ReviewTransactionClicked);
    }
}

#[derive(Debug, Default)]
struct ReviewState {
    visible: bool,
    code_visible: bool,
}

/// Modal showing what a transaction is about to authorize. Closing it
/// happens immediately; there is no transition.
#[derive(Clone)]
pub struct ReviewTransactionModal {
    events: EventBus,
    state: Arc<Mutex<ReviewState>>,
}

impl ReviewTransactionModal {
    pub fn new(events: EventBus) -> Self {
        Self {
            events,
            state: Arc::new(Mutex::new(ReviewState::default())),
        }
    }

    fn state(&self) -> MutexGuard<'_, ReviewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open(&self) {
        self.state().visible = true;
    }

    pub fn close(&self) {
        self.state().visible = false;
        self.events.emit(KitEvent::ModalClosed);
    }

    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    /// Shows or hides the contract source for developers.
    pub fn toggle_code(&self) {
        let mut state = self.state();
        state.code_visible = !state.code_visible;
    }

    pub fn is_code_visible(&self) -> bool {
        self.state().code_visible
    }
}
