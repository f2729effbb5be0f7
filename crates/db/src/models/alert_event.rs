//! Breach event entity model and list filter.

use serde::Serialize;
use sqlx::FromRow;
use tripwire_core::alert::AlertEvent as CoreAlertEvent;
use tripwire_core::types::{DbId, Timestamp};

/// A row from the `alert_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AlertEvent {
    pub id: DbId,
    pub alert_id: DbId,
    pub metric_name: String,
    pub metric_value: f64,
    pub timestamp: Timestamp,
    pub message: String,
    pub created_at: Timestamp,
}

impl From<AlertEvent> for CoreAlertEvent {
    fn from(row: AlertEvent) -> Self {
        CoreAlertEvent {
            id: row.id,
            alert_id: row.alert_id,
            metric_name: row.metric_name,
            metric_value: row.metric_value,
            timestamp: row.timestamp,
            message: row.message,
        }
    }
}

/// Optional filters for listing events. Bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct AlertEventFilter {
    pub metric_name: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}
