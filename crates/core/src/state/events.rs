//! Optional lifecycle event channel.

use gk_protocol::ipc::Event;
use tokio::sync::mpsc::Sender;

/// Where the executor publishes lifecycle [`Event`]s.
///
/// Events are informational. A sink without a channel drops them, and a
/// closed or full receiver never affects execution.
#[derive(Debug, Clone, Default)]
pub struct EventSink {
    tx: Option<Sender<Event>>,
}

impl EventSink {
    /// A sink that drops every event.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn new(tx: Sender<Event>) -> Self {
        Self { tx: Some(tx) }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    pub async fn emit(&self, event: Event) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(event).await;
        }
    }
}

impl From<Sender<Event>> for EventSink {
    fn from(tx: Sender<Event>) -> Self {
        Self::new(tx)
    }
}
