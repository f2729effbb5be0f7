//! In-process collaborators.
//!
//! Used by the engine's tests and by callers embedding the engine without a
//! database. Each store can be told to fail specific operations so error
//! isolation can be exercised.

use std::collections::{HashMap, HashSet};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::alert::{AlertEvent, AlertRule, NewAlertEvent};
use crate::cooldown::latest;
use crate::evaluation::error::{PublishError, StoreError};
use crate::evaluation::store::{EventLog, EventPublisher, RuleStore};
use crate::types::{DbId, Timestamp};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|e| e.into_inner())
}

fn injected(what: &str) -> StoreError {
    StoreError::backend(io::Error::other(format!("injected {what} failure")))
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Rule store backed by a `HashMap`.
#[derive(Debug, Default)]
pub struct InMemoryRuleStore {
    rules: Mutex<HashMap<DbId, AlertRule>>,
    next_id: AtomicI64,
    fail_lookups: AtomicBool,
    fail_updates: Mutex<HashSet<DbId>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `rule` under a freshly assigned id and return it.
    pub fn insert(&self, mut rule: AlertRule) -> AlertRule {
        rule.id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        lock(&self.rules).insert(rule.id, rule.clone());
        rule
    }

    pub fn get(&self, id: DbId) -> Option<AlertRule> {
        lock(&self.rules).get(&id).cloned()
    }

    pub fn remove(&self, id: DbId) -> bool {
        lock(&self.rules).remove(&id).is_some()
    }

    /// Make every subsequent lookup fail.
    pub fn fail_lookups(&self, fail: bool) {
        self.fail_lookups.store(fail, Ordering::SeqCst);
    }

    /// Make trigger-time updates for `id` fail.
    pub fn fail_updates_for(&self, id: DbId) {
        lock(&self.fail_updates).insert(id);
    }
}

#[async_trait]
impl RuleStore for InMemoryRuleStore {
    async fn find_by_metric_name(&self, metric_name: &str) -> Result<Vec<AlertRule>, StoreError> {
        if self.fail_lookups.load(Ordering::SeqCst) {
            return Err(injected("lookup"));
        }
        let mut found: Vec<AlertRule> = lock(&self.rules)
            .values()
            .filter(|r| r.metric_name == metric_name)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.id);
        Ok(found)
    }

    async fn update_last_triggered(
        &self,
        rule_id: DbId,
        triggered_at: Timestamp,
    ) -> Result<(), StoreError> {
        if lock(&self.fail_updates).contains(&rule_id) {
            return Err(injected("update"));
        }
        let mut rules = lock(&self.rules);
        let rule = rules.get_mut(&rule_id).ok_or(StoreError::NotFound(rule_id))?;
        rule.last_triggered = latest(rule.last_triggered, Some(triggered_at));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Event log backed by a `Vec`, in append order.
#[derive(Debug, Default)]
pub struct InMemoryEventLog {
    events: Mutex<Vec<AlertEvent>>,
    next_id: AtomicI64,
    fail_appends: Mutex<HashSet<DbId>>,
}

impl InMemoryEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every stored event.
    pub fn events(&self) -> Vec<AlertEvent> {
        lock(&self.events).clone()
    }

    /// Stored events produced by one rule.
    pub fn events_for(&self, alert_id: DbId) -> Vec<AlertEvent> {
        lock(&self.events)
            .iter()
            .filter(|e| e.alert_id == alert_id)
            .cloned()
            .collect()
    }

    /// Make appends for events owned by `alert_id` fail.
    pub fn fail_appends_for(&self, alert_id: DbId) {
        lock(&self.fail_appends).insert(alert_id);
    }
}

#[async_trait]
impl EventLog for InMemoryEventLog {
    async fn append(&self, event: NewAlertEvent) -> Result<AlertEvent, StoreError> {
        if lock(&self.fail_appends).contains(&event.alert_id) {
            return Err(injected("append"));
        }
        let stored = AlertEvent {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            alert_id: event.alert_id,
            metric_name: event.metric_name,
            metric_value: event.metric_value,
            timestamp: event.timestamp,
            message: event.message,
        };
        lock(&self.events).push(stored.clone());
        Ok(stored)
    }
}

// ---------------------------------------------------------------------------
// Publisher
// ---------------------------------------------------------------------------

/// Publisher that records what it was asked to publish.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<AlertEvent>>,
    fail: AtomicBool,
}

impl RecordingPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn published(&self) -> Vec<AlertEvent> {
        lock(&self.published).clone()
    }

    /// Make every subsequent publish fail without recording.
    pub fn fail_publishes(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

impl EventPublisher for RecordingPublisher {
    fn publish(&self, event: &AlertEvent) -> Result<(), PublishError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(PublishError::Transport("injected publish failure".to_string()));
        }
        lock(&self.published).push(event.clone());
        Ok(())
    }
}
