//! Stores that live outside SQLite: an in-process vector, and a stand-in
//! for a backend that could not be reached.

use super::store::{ActivityStore, newest_first};
use crate::errors::{AppError, AppResult};
use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use parking_lot::Mutex;

/// Process-local store; records vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryActivityStore {
    records: Mutex<Vec<ActivityRecord>>,
}

impl MemoryActivityStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}

impl ActivityStore for MemoryActivityStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn insert(&self, record: &ActivityRecord) -> AppResult<()> {
        let mut records = self.records.lock();
        if records.iter().any(|r| r.id == record.id) {
            return Err(AppError::Backend(format!("duplicate activity id {}", record.id)));
        }
        records.push(record.clone());
        Ok(())
    }

    fn list_all(&self) -> AppResult<Vec<ActivityRecord>> {
        Ok(newest_first(self.records.lock().iter().cloned()))
    }

    fn delete_by_session(&self, session_id: &str) -> AppResult<usize> {
        let mut records = self.records.lock();
        let before = records.len();
        records.retain(|r| r.session_id != session_id);
        Ok(before - records.len())
    }

    fn list_by_type(&self, kind: EventType) -> AppResult<Vec<ActivityRecord>> {
        let records = self.records.lock();
        Ok(newest_first(
            records.iter().filter(|r| r.event_type() == kind).cloned(),
        ))
    }
}

/// Backend that is configured but unreachable. Every call fails with the
/// reason it could not be opened.
#[derive(Debug, Clone)]
pub struct UnavailableStore {
    reason: String,
}

impl UnavailableStore {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    fn fail<T>(&self) -> AppResult<T> {
        Err(AppError::Backend(self.reason.clone()))
    }
}

impl ActivityStore for UnavailableStore {
    fn backend(&self) -> &'static str {
        "unavailable"
    }

    fn insert(&self, _record: &ActivityRecord) -> AppResult<()> {
        self.fail()
    }

    fn list_all(&self) -> AppResult<Vec<ActivityRecord>> {
        self.fail()
    }

    fn delete_by_session(&self, _session_id: &str) -> AppResult<usize> {
        self.fail()
    }

    fn list_by_type(&self, _kind: EventType) -> AppResult<Vec<ActivityRecord>> {
        self.fail()
    }
}
