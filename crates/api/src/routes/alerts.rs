//! Route definitions for the `/alerts` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::alerts;
use crate::state::AppState;

/// Routes mounted at `/alerts`.
///
/// ```text
/// GET    /        -> list_alerts
/// POST   /        -> create_alert
/// DELETE /{id}    -> delete_alert
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(alerts::list_alerts).post(alerts::create_alert))
        .route("/{id}", delete(alerts::delete_alert))
}
