//! Threshold rules and the breach events they produce.

use serde::{Deserialize, Serialize};

use crate::comparator::Comparator;
use crate::types::{DbId, Timestamp};

/// A standing threshold condition watched against one metric stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRule {
    pub id: DbId,
    /// Metric stream this rule watches. Many rules may share a name.
    pub metric_name: String,
    /// Right-hand operand of the comparison.
    pub threshold: f64,
    pub comparator: Comparator,
    /// Copied into every event this rule produces.
    pub message: String,
    /// Minimum spacing between consecutive triggers. `0.0` disables suppression.
    pub cooldown_seconds: f64,
    /// Most recent breach that passed the cooldown gate.
    pub last_triggered: Option<Timestamp>,
}

impl AlertRule {
    /// Whether `value` breaches this rule's threshold.
    pub fn is_breached_by(&self, value: f64) -> bool {
        self.comparator.evaluate(value, self.threshold)
    }
}

/// An event about to be appended to the event log (no id yet).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAlertEvent {
    pub alert_id: DbId,
    pub metric_name: String,
    pub metric_value: f64,
    pub timestamp: Timestamp,
    pub message: String,
}

impl NewAlertEvent {
    /// Build the event a breach of `rule` by `value` at `timestamp` produces.
    pub fn for_breach(rule: &AlertRule, value: f64, timestamp: Timestamp) -> Self {
        Self {
            alert_id: rule.id,
            metric_name: rule.metric_name.clone(),
            metric_value: value,
            timestamp,
            message: rule.message.clone(),
        }
    }
}

/// An immutable, stored record of one confirmed breach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    pub id: DbId,
    /// The rule that produced this event.
    pub alert_id: DbId,
    pub metric_name: String,
    pub metric_value: f64,
    /// Evaluation time of the breaching sample.
    pub timestamp: Timestamp,
    pub message: String,
}
