use std::sync::Arc;
use std::time::Duration;

use crate::ws::manager::WsManager;

/// Interval between heartbeat pings.
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Spawn a background task that pings every connected client each `period`.
///
/// Runs until aborted through the returned handle at shutdown.
pub fn start_heartbeat(ws_manager: Arc<WsManager>, period: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);

        loop {
            interval.tick().await;
            let count = ws_manager.ping_all().await;
            tracing::debug!(count, "WebSocket heartbeat ping");
        }
    })
}
