//! LiveHub: fan-out of resource changes to websocket subscribers
//!
//! ```text
//! REST handlers ── publish(LiveEvent) ──► broadcast::Sender
//!                                              │
//!                                   ┌──────────┼──────────┐
//!                                   ▼          ▼          ▼
//!                               dashboard   dashboard   mobile app
//!                               (all events)            (public only)
//! ```

use shared::live::{LiveAction, LiveEvent};
use tokio::sync::broadcast;

/// Enough to absorb a burst of bulk edits
const BROADCAST_CAPACITY: usize = 256;

#[derive(Clone)]
pub struct LiveHub {
    tx: broadcast::Sender<LiveEvent>,
}

impl Default for LiveHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveHub {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LiveEvent> {
        self.tx.subscribe()
    }

    pub fn publish(&self, event: LiveEvent) {
        // Err only means nobody is listening
        let _ = self.tx.send(event);
    }

    /// Publish a change with the record serialized as the payload
    pub fn publish_record<T: serde::Serialize>(
        &self,
        resource: &str,
        action: LiveAction,
        id: i64,
        record: &T,
    ) {
        let data = serde_json::to_value(record).ok();
        self.publish(LiveEvent::new(resource, action, id, data));
    }

    pub fn publish_deleted(&self, resource: &str, id: i64) {
        self.publish(LiveEvent::new(resource, LiveAction::Deleted, id, None));
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
