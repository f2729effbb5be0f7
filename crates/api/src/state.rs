use std::sync::Arc;

use tripwire_core::evaluation::Evaluator;

use crate::config::ServerConfig;
use crate::ws::WsManager;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: tripwire_db::DbPool,
    /// Server configuration (token secret, timeouts).
    pub config: Arc<ServerConfig>,
    /// WebSocket connection manager (live dashboard clients).
    pub ws_manager: Arc<WsManager>,
    /// Fan-out bus for breach events.
    pub event_bus: Arc<tripwire_events::EventBus>,
    /// Threshold evaluation engine, wired to the stores and the bus.
    pub evaluator: Arc<Evaluator>,
}
