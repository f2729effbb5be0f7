//! PostgreSQL implementations of the engine's collaborator traits.

use async_trait::async_trait;
use tripwire_core::alert::{AlertEvent, AlertRule, NewAlertEvent};
use tripwire_core::evaluation::{EventLog, RuleStore, StoreError};
use tripwire_core::types::{DbId, Timestamp};

use crate::repositories::{AlertEventRepo, AlertRepo};
use crate::DbPool;

/// [`RuleStore`] over the `alerts` table.
#[derive(Clone)]
pub struct PgRuleStore {
    pool: DbPool,
}

impl PgRuleStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RuleStore for PgRuleStore {
    async fn find_by_metric_name(&self, metric_name: &str) -> Result<Vec<AlertRule>, StoreError> {
        let rows = AlertRepo::list_by_metric_name(&self.pool, metric_name)
            .await
            .map_err(StoreError::backend)?;

        rows.into_iter()
            .map(|row| AlertRule::try_from(row).map_err(StoreError::backend))
            .collect()
    }

    async fn update_last_triggered(
        &self,
        rule_id: DbId,
        triggered_at: Timestamp,
    ) -> Result<(), StoreError> {
        let matched = AlertRepo::update_last_triggered(&self.pool, rule_id, triggered_at)
            .await
            .map_err(StoreError::backend)?;
        if !matched {
            return Err(StoreError::NotFound(rule_id));
        }
        Ok(())
    }
}

/// [`EventLog`] over the `alert_events` table.
#[derive(Clone)]
pub struct PgEventLog {
    pool: DbPool,
}

impl PgEventLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLog for PgEventLog {
    async fn append(&self, event: NewAlertEvent) -> Result<AlertEvent, StoreError> {
        AlertEventRepo::insert(&self.pool, &event)
            .await
            .map(AlertEvent::from)
            .map_err(StoreError::backend)
    }
}
