//! Rule entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use tripwire_core::alert::AlertRule;
use tripwire_core::comparator::Comparator;
use tripwire_core::error::CoreError;
use tripwire_core::types::{DbId, Timestamp};

/// A row from the `alerts` table.
///
/// `comparator` stays a raw tag here; the table's CHECK constraint keeps it
/// within the known set and [`TryFrom`] turns it into a [`Comparator`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Alert {
    pub id: DbId,
    pub metric_name: String,
    pub threshold: f64,
    pub comparator: String,
    pub message: String,
    pub cooldown_seconds: f64,
    pub last_triggered: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Validated input for inserting a rule.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAlert {
    pub metric_name: String,
    pub threshold: f64,
    pub comparator: Comparator,
    pub message: String,
    pub cooldown_seconds: f64,
}

impl TryFrom<Alert> for AlertRule {
    type Error = CoreError;

    fn try_from(row: Alert) -> Result<Self, Self::Error> {
        Ok(AlertRule {
            id: row.id,
            metric_name: row.metric_name,
            threshold: row.threshold,
            comparator: row.comparator.parse()?,
            message: row.message,
            cooldown_seconds: row.cooldown_seconds,
            last_triggered: row.last_triggered,
        })
    }
}
