//! Narrow read/write/delete contract against the activity backend.
//!
//! Implementations return `Result`. The free functions at the bottom are
//! the tracking boundary: they log the failure and degrade (reads become
//! empty lists, writes and deletes become no-ops).

use crate::errors::AppResult;
use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;

pub trait ActivityStore: Send + Sync {
    /// Short backend name for diagnostics ("sqlite", "memory", ...).
    fn backend(&self) -> &'static str;

    fn insert(&self, record: &ActivityRecord) -> AppResult<()>;

    /// Every record, newest first.
    fn list_all(&self) -> AppResult<Vec<ActivityRecord>>;

    /// Remove the records of one session; returns how many went away.
    fn delete_by_session(&self, session_id: &str) -> AppResult<usize>;

    /// Records of one kind, newest first.
    fn list_by_type(&self, kind: EventType) -> AppResult<Vec<ActivityRecord>>;

    /// Records of one session, newest first.
    fn list_by_session(&self, session_id: &str) -> AppResult<Vec<ActivityRecord>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|r| r.session_id == session_id)
            .collect())
    }
}

/// Persist `record`; a failure is logged and dropped. Returns whether it was written.
pub fn insert_or_log(store: &dyn ActivityStore, record: &ActivityRecord) -> bool {
    match store.insert(record) {
        Ok(()) => {
            tracing::debug!(
                backend = store.backend(),
                id = %record.id,
                event_type = %record.event_type(),
                "activity stored"
            );
            true
        }
        Err(e) => {
            tracing::warn!(
                backend = store.backend(),
                id = %record.id,
                error = %e,
                "failed to store activity, dropping it"
            );
            false
        }
    }
}

pub fn list_all_or_empty(store: &dyn ActivityStore) -> Vec<ActivityRecord> {
    store.list_all().unwrap_or_else(|e| {
        tracing::warn!(backend = store.backend(), error = %e, "failed to load activities");
        Vec::new()
    })
}

pub fn list_by_type_or_empty(store: &dyn ActivityStore, kind: EventType) -> Vec<ActivityRecord> {
    store.list_by_type(kind).unwrap_or_else(|e| {
        tracing::warn!(backend = store.backend(), event_type = %kind, error = %e, "failed to load activities by type");
        Vec::new()
    })
}

pub fn list_by_session_or_empty(store: &dyn ActivityStore, session_id: &str) -> Vec<ActivityRecord> {
    store.list_by_session(session_id).unwrap_or_else(|e| {
        tracing::warn!(backend = store.backend(), session_id, error = %e, "failed to load session activities");
        Vec::new()
    })
}

/// Delete one session's records; a failure is logged and counts as zero.
pub fn delete_session_or_log(store: &dyn ActivityStore, session_id: &str) -> usize {
    match store.delete_by_session(session_id) {
        Ok(n) => {
            tracing::debug!(backend = store.backend(), session_id, deleted = n, "session activities cleared");
            n
        }
        Err(e) => {
            tracing::warn!(backend = store.backend(), session_id, error = %e, "failed to clear session activities");
            0
        }
    }
}

/// Newest first; among equal timestamps the later insertion comes first.
/// `records` must be in insertion order.
pub(crate) fn newest_first(records: impl DoubleEndedIterator<Item = ActivityRecord>) -> Vec<ActivityRecord> {
    let mut out: Vec<ActivityRecord> = records.rev().collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out
}
