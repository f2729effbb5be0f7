//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the fan-out hub for breach events. It is created once per
//! process, shared via `Arc<EventBus>`, and dropped on shutdown, which closes
//! the channel and ends every subscriber loop.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tripwire_core::alert::AlertEvent;
use tripwire_core::evaluation::{EventPublisher, PublishError};

// ---------------------------------------------------------------------------
// BusMessage
// ---------------------------------------------------------------------------

/// Wire envelope for messages forwarded to live clients.
///
/// Serializes as `{"type": "alert_event", "data": { ... }}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum BusMessage {
    AlertEvent(AlertEvent),
}

impl BusMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
pub const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`AlertEvent`].
///
/// # Usage
///
/// ```rust
/// use tripwire_events::EventBus;
///
/// let bus = EventBus::default();
/// let _rx = bus.subscribe();
/// assert_eq!(bus.subscriber_count(), 1);
/// ```
pub struct EventBus {
    sender: broadcast::Sender<AlertEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Send an event to all current subscribers.
    ///
    /// Returns how many subscribers it was queued for. Zero subscribers is
    /// not an error; the event is simply not delivered.
    pub fn send(&self, event: AlertEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<AlertEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl EventPublisher for EventBus {
    fn publish(&self, event: &AlertEvent) -> Result<(), PublishError> {
        let delivered = self.send(event.clone());
        tracing::debug!(event_id = event.id, subscribers = delivered, "Alert event published");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
