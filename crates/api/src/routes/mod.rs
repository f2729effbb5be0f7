pub mod alert_events;
pub mod alerts;
pub mod health;
pub mod metrics;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /ws                 WebSocket (server push of alert events)
/// /alerts             list, create
/// /alerts/{id}        delete
/// /metrics            ingest a sample (requires auth)
/// /alert-events       paginated breach history
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ws", get(ws::ws_handler))
        .nest("/alerts", alerts::router())
        .nest("/metrics", metrics::router())
        .nest("/alert-events", alert_events::router())
}
