use lk_api_types::KitEvent;
use tokio::sync::broadcast;
use tracing::debug;

const EVENT_CAPACITY: usize = 64;

/// Fan-out of [`KitEvent`]s to the host application.
///
/// Emitting with no listener is not an error; the event is simply dropped.
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<KitEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self { tx }
    }

    pub fn emit(&self, event: KitEvent) {
        debug!(?event, "kit event");
        let _ = self.tx.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<KitEvent> {
        self.tx.subscribe()
    }
}
