//! Per-sample rule evaluation.
//!
//! Pure orchestration over the collaborator traits in
//! [`store`](crate::evaluation::store); the caller injects concrete stores
//! and the notification publisher at construction.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;

use crate::alert::{AlertEvent, AlertRule, NewAlertEvent};
use crate::cooldown::{is_cooling_down, latest};
use crate::evaluation::error::{EvaluationError, StoreError};
use crate::evaluation::locks::TriggerLocks;
use crate::evaluation::store::{EventLog, EventPublisher, RuleStore};
use crate::sample::MetricSample;
use crate::types::{DbId, Timestamp};

/// Default upper bound on a single storage call.
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);

/// Tuning knobs for [`Evaluator`].
#[derive(Debug, Clone)]
pub struct EvaluatorConfig {
    /// Upper bound on each rule-store / event-log call.
    pub store_timeout: Duration,
    /// Serialize trigger decisions per rule within this process, so two
    /// concurrent samples cannot both pass the same cooldown window.
    pub serialize_per_rule: bool,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            store_timeout: DEFAULT_STORE_TIMEOUT,
            serialize_per_rule: true,
        }
    }
}

/// What happened to one rule for one sample.
#[derive(Debug)]
pub enum RuleOutcome {
    /// Skipped: the rule fired less than `cooldown_seconds` ago.
    CoolingDown,
    /// The comparator did not hold.
    NotBreached,
    /// An event was stored (and handed to the publisher).
    Triggered {
        event: AlertEvent,
        /// `false` when the event was stored but the trigger-time update failed.
        trigger_time_recorded: bool,
    },
    /// Appending the event failed; nothing was recorded for this rule.
    Failed(StoreError),
}

/// Summary of one `evaluate` call.
#[derive(Debug)]
pub struct EvaluationReport {
    pub metric_name: String,
    pub evaluated_at: Timestamp,
    /// One entry per matching rule, keyed by rule id.
    pub outcomes: Vec<(DbId, RuleOutcome)>,
}

impl EvaluationReport {
    pub fn rules_matched(&self) -> usize {
        self.outcomes.len()
    }

    /// Events stored during this call.
    pub fn events(&self) -> Vec<&AlertEvent> {
        self.outcomes
            .iter()
            .filter_map(|(_, o)| match o {
                RuleOutcome::Triggered { event, .. } => Some(event),
                _ => None,
            })
            .collect()
    }

    pub fn triggered(&self) -> usize {
        self.count(|o| matches!(o, RuleOutcome::Triggered { .. }))
    }

    pub fn suppressed(&self) -> usize {
        self.count(|o| matches!(o, RuleOutcome::CoolingDown))
    }

    pub fn not_breached(&self) -> usize {
        self.count(|o| matches!(o, RuleOutcome::NotBreached))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RuleOutcome::Failed(_)))
    }

    /// Outcome for a specific rule, if it matched.
    pub fn outcome_for(&self, rule_id: DbId) -> Option<&RuleOutcome> {
        self.outcomes
            .iter()
            .find(|(id, _)| *id == rule_id)
            .map(|(_, o)| o)
    }

    fn count(&self, pred: impl Fn(&RuleOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }
}

/// Evaluates samples against the rules watching their metric.
pub struct Evaluator {
    rules: Arc<dyn RuleStore>,
    events: Arc<dyn EventLog>,
    publisher: Arc<dyn EventPublisher>,
    config: EvaluatorConfig,
    locks: Option<TriggerLocks>,
}

impl Evaluator {
    pub fn new(
        rules: Arc<dyn RuleStore>,
        events: Arc<dyn EventLog>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self::with_config(rules, events, publisher, EvaluatorConfig::default())
    }

    pub fn with_config(
        rules: Arc<dyn RuleStore>,
        events: Arc<dyn EventLog>,
        publisher: Arc<dyn EventPublisher>,
        config: EvaluatorConfig,
    ) -> Self {
        let locks = config.serialize_per_rule.then(TriggerLocks::new);
        Self {
            rules,
            events,
            publisher,
            config,
            locks,
        }
    }

    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Release in-process state held for a deleted rule.
    pub fn forget_rule(&self, rule_id: DbId) {
        if let Some(locks) = &self.locks {
            locks.forget(rule_id);
        }
    }

    /// Evaluate one sample against every rule watching its metric.
    ///
    /// Fails only when the rule lookup fails; per-rule storage and publish
    /// failures are logged and reported in the returned outcomes.
    pub async fn evaluate(
        &self,
        sample: &MetricSample,
    ) -> Result<EvaluationReport, EvaluationError> {
        let now = sample.evaluation_time(Utc::now());

        let rules = self
            .bounded(self.rules.find_by_metric_name(&sample.metric_name))
            .await
            .map_err(|source| EvaluationError::Lookup {
                metric_name: sample.metric_name.clone(),
                source,
            })?;

        if rules.is_empty() {
            tracing::debug!(metric_name = %sample.metric_name, "No rules watch this metric");
        }

        let outcomes = join_all(
            rules
                .iter()
                .map(|rule| self.evaluate_rule(rule, sample.value, now)),
        )
        .await;

        let report = EvaluationReport {
            metric_name: sample.metric_name.clone(),
            evaluated_at: now,
            outcomes: rules.iter().map(|r| r.id).zip(outcomes).collect(),
        };

        tracing::debug!(
            metric_name = %report.metric_name,
            value = sample.value,
            matched = report.rules_matched(),
            triggered = report.triggered(),
            suppressed = report.suppressed(),
            failed = report.failed(),
            "Sample evaluated"
        );

        Ok(report)
    }

    async fn evaluate_rule(&self, rule: &AlertRule, value: f64, now: Timestamp) -> RuleOutcome {
        let Some(locks) = &self.locks else {
            return self.apply(rule, rule.last_triggered, value, now).await;
        };

        let mut slot = locks.acquire(rule.id).await;
        let last_triggered = latest(rule.last_triggered, *slot);
        let outcome = self.apply(rule, last_triggered, value, now).await;
        if matches!(outcome, RuleOutcome::Triggered { .. }) {
            *slot = latest(*slot, Some(now));
        }
        outcome
    }

    /// Cooldown gate, comparator, append, trigger-time update, publish.
    async fn apply(
        &self,
        rule: &AlertRule,
        last_triggered: Option<Timestamp>,
        value: f64,
        now: Timestamp,
    ) -> RuleOutcome {
        if is_cooling_down(rule.cooldown_seconds, last_triggered, now) {
            tracing::debug!(
                alert_id = rule.id,
                metric_name = %rule.metric_name,
                cooldown_seconds = rule.cooldown_seconds,
                "Alert in cooldown, skipping"
            );
            return RuleOutcome::CoolingDown;
        }

        if !rule.is_breached_by(value) {
            return RuleOutcome::NotBreached;
        }

        let new_event = NewAlertEvent::for_breach(rule, value, now);
        let event = match self.bounded(self.events.append(new_event)).await {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    alert_id = rule.id,
                    metric_name = %rule.metric_name,
                    "Failed to record alert event"
                );
                return RuleOutcome::Failed(e);
            }
        };

        // The event stays recorded even if this update fails.
        let trigger_time_recorded = match self
            .bounded(self.rules.update_last_triggered(rule.id, now))
            .await
        {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    alert_id = rule.id,
                    event_id = event.id,
                    metric_name = %rule.metric_name,
                    "Alert event recorded but trigger time update failed"
                );
                false
            }
        };

        tracing::info!(
            alert_id = rule.id,
            event_id = event.id,
            metric_name = %rule.metric_name,
            value,
            threshold = rule.threshold,
            comparator = %rule.comparator,
            "Alert triggered"
        );

        if let Err(e) = self.publisher.publish(&event) {
            tracing::warn!(
                error = %e,
                alert_id = rule.id,
                event_id = event.id,
                "Failed to publish alert event"
            );
        }

        RuleOutcome::Triggered {
            event,
            trigger_time_recorded,
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, StoreError>>,
    ) -> Result<T, StoreError> {
        let limit = self.config.store_timeout;
        tokio::time::timeout(limit, call)
            .await
            .map_err(|_| StoreError::Timeout(limit))?
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
