//! Collaborator traits the engine reads from and writes to.

use async_trait::async_trait;

use crate::alert::{AlertEvent, AlertRule, NewAlertEvent};
use crate::evaluation::error::{PublishError, StoreError};
use crate::types::{DbId, Timestamp};

/// Source of threshold rules.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// All rules watching `metric_name`, in any order.
    async fn find_by_metric_name(&self, metric_name: &str) -> Result<Vec<AlertRule>, StoreError>;

    /// Durably record that `rule_id` fired at `triggered_at`.
    ///
    /// Implementations must never move the stored value backwards.
    async fn update_last_triggered(
        &self,
        rule_id: DbId,
        triggered_at: Timestamp,
    ) -> Result<(), StoreError>;
}

/// Append-only store of breach events.
#[async_trait]
pub trait EventLog: Send + Sync {
    /// Store `event`, returning it with its assigned id.
    async fn append(&self, event: NewAlertEvent) -> Result<AlertEvent, StoreError>;
}

/// Fan-out to live subscribers.
///
/// Must not block: a slow or absent subscriber is the publisher's problem,
/// never the caller's.
pub trait EventPublisher: Send + Sync {
    fn publish(&self, event: &AlertEvent) -> Result<(), PublishError>;
}
