//! # Record Store
//!
//! Single source of truth for the run's [`PatientRecord`]. Reads always
//! clone the committed record so a step never holds a snapshot across a
//! suspension point.

use crate::action::{PatientAction, apply};
use crate::error::RecordError;
use crate::record::PatientRecord;
use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Debug, Default)]
struct StoreInner {
    record: PatientRecord,
    journal: Vec<PatientAction>,
}

/// Shared handle to the committed record. Cloning shares the store.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest committed record.
    pub fn current(&self) -> PatientRecord {
        self.inner.read().record.clone()
    }

    /// Apply and commit one action. A rejected action leaves the record
    /// and journal untouched.
    pub fn dispatch(&self, action: PatientAction) -> Result<(), RecordError> {
        let mut inner = self.inner.write();
        let next = apply(inner.record.clone(), action.clone()).inspect_err(|e| {
            tracing::warn!(action = %action, error = %e, "Patient action rejected");
        })?;
        tracing::debug!(action = %action, "Patient action applied");
        inner.record = next;
        if matches!(action, PatientAction::Reset) {
            inner.journal.clear();
        } else {
            inner.journal.push(action);
        }
        Ok(())
    }

    /// Actions committed since the last reset, in order.
    pub fn journal(&self) -> Vec<PatientAction> {
        self.inner.read().journal.clone()
    }

    /// Number of actions committed since the last reset.
    pub fn revision(&self) -> usize {
        self.inner.read().journal.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CallType;

    #[test]
    fn rejected_action_does_not_commit() {
        let store = RecordStore::new();
        store.dispatch(PatientAction::SetCallType(CallType::Trauma)).unwrap();
        assert!(store.dispatch(PatientAction::SetCallType(CallType::Medical)).is_err());

        assert_eq!(store.current().call_type, Some(CallType::Trauma));
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn reads_are_fresh_after_dispatch() {
        let store = RecordStore::new();
        let before = store.current();
        store.dispatch(PatientAction::SetShock(true)).unwrap();
        assert!(!before.is_in_shock);
        assert!(store.current().is_in_shock);
    }

    #[test]
    fn reset_clears_journal() {
        let store = RecordStore::new();
        store.dispatch(PatientAction::intervention("OPA inserted")).unwrap();
        store.dispatch(PatientAction::Reset).unwrap();
        assert!(store.journal().is_empty());
        assert_eq!(store.current(), PatientRecord::default());
    }
}
