use axum::routing::get;
use axum::Router;

use crate::handlers::alert_events;
use crate::state::AppState;

/// Routes mounted at `/alert-events`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(alert_events::list_alert_events))
}
