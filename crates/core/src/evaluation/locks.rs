//! Per-rule serialization of trigger decisions within one process.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::types::{DbId, Timestamp};

/// Guard over one rule's slot. Holds the last trigger time this process
/// committed for the rule.
pub(crate) type TriggerSlot = OwnedMutexGuard<Option<Timestamp>>;

/// One async mutex per rule id. While a slot is held, no other evaluation
/// in this process can decide whether the same rule fires.
#[derive(Debug, Default)]
pub(crate) struct TriggerLocks {
    slots: Mutex<HashMap<DbId, Arc<AsyncMutex<Option<Timestamp>>>>>,
}

impl TriggerLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `rule_id`'s slot.
    pub(crate) async fn acquire(&self, rule_id: DbId) -> TriggerSlot {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(|e| e.into_inner());
            Arc::clone(slots.entry(rule_id).or_default())
        };
        slot.lock_owned().await
    }

    /// Drop `rule_id`'s slot. A guard still held keeps its own copy alive.
    pub(crate) fn forget(&self, rule_id: DbId) {
        self.slots
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&rule_id);
    }

    /// Number of rules with a slot.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}
