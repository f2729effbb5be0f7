//! Bus-to-WebSocket forwarding.

use std::sync::Arc;

use axum::extract::ws::Message;
use tokio::sync::broadcast;
use tripwire_core::alert::AlertEvent;
use tripwire_events::BusMessage;

use crate::ws::WsManager;

/// Forwards breach events from the bus to every WebSocket client.
pub struct AlertRelay {
    ws_manager: Arc<WsManager>,
}

impl AlertRelay {
    pub fn new(ws_manager: Arc<WsManager>) -> Self {
        Self { ws_manager }
    }

    /// Run the forwarding loop.
    ///
    /// Exits when the channel is closed, i.e. when the
    /// [`EventBus`](tripwire_events::EventBus) is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<AlertEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.forward(event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Alert relay lagged, events dropped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, alert relay shutting down");
                    break;
                }
            }
        }
    }

    async fn forward(&self, event: AlertEvent) {
        let event_id = event.id;
        let alert_id = event.alert_id;
        match BusMessage::AlertEvent(event).to_json() {
            Ok(json) => {
                let delivered = self.ws_manager.broadcast(Message::Text(json.into())).await;
                tracing::debug!(event_id, alert_id, delivered, "Alert event relayed");
            }
            Err(e) => {
                tracing::error!(error = %e, event_id, alert_id, "Failed to serialize alert event");
            }
        }
    }
}
