//! Append-only, in-memory policy store.
//!
//! Readers share an `RwLock` read guard; the single write path (append) takes
//! the exclusive guard. Records are immutable once pushed, so the lock only
//! protects the `Vec` itself.

use std::sync::{PoisonError, RwLock, RwLockReadGuard};

use crate::record::PolicyRecord;

/// Process-lifetime policy store. Share it via `Arc`.
#[derive(Debug, Default)]
pub struct PolicyStore {
    policies: RwLock<Vec<PolicyRecord>>,
}

impl PolicyStore {
    pub fn new() -> Self {
        Self {
            policies: RwLock::new(Vec::new()),
        }
    }

    /// Append a record. Duplicates and conflicting records are kept; insertion
    /// order is the tie-break for every lookup.
    pub fn add_policy(
        &self,
        subject: impl Into<String>,
        resource: impl Into<String>,
        action: impl Into<String>,
        effect: bool,
    ) {
        self.push(PolicyRecord::new(subject, resource, action, effect));
    }

    /// Append an already-built record.
    pub fn push(&self, record: PolicyRecord) {
        tracing::debug!(
            subject = %record.subject,
            resource = %record.resource,
            action = %record.action,
            effect = record.effect,
            "policy appended"
        );
        // A push either completes or never happens, so a poisoned guard still
        // holds a consistent list.
        let mut g = self.policies.write().unwrap_or_else(PoisonError::into_inner);
        g.push(record);
    }

    /// Copy of every record in insertion order.
    pub fn list_policies(&self) -> Vec<PolicyRecord> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Run `f` over the records under a single read guard.
    ///
    /// This is the read view the decision engine scans. The guard is released
    /// when `f` returns; nothing borrowed from the slice may escape.
    pub fn with_records<R>(&self, f: impl FnOnce(&[PolicyRecord]) -> R) -> R {
        let g = self.read();
        f(g.as_slice())
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<PolicyRecord>> {
        self.policies.read().unwrap_or_else(PoisonError::into_inner)
    }
}
