//! In-memory list of activities backing the dashboard views.
//!
//! Mutated only by prepending a fresh record, wholesale replacement on
//! load/refresh, and clearing to empty.

use crate::db::store::{ActivityStore, delete_session_or_log, list_all_or_empty};
use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug)]
pub struct ActivityCache {
    records: RwLock<Vec<ActivityRecord>>,
    loading: AtomicBool,
}

/// Holds `is_loading` up while a bulk operation is in flight.
pub struct LoadingGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

impl Default for ActivityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ActivityCache {
    /// Starts in the loading state, like a view that has not fetched yet.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            loading: AtomicBool::new(true),
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn begin_load(&self) -> LoadingGuard<'_> {
        self.loading.store(true, Ordering::SeqCst);
        LoadingGuard {
            flag: &self.loading,
        }
    }

    /// Replace the contents with everything the store holds. Returns the new size.
    pub fn load(&self, store: &dyn ActivityStore) -> usize {
        let _loading = self.begin_load();
        let fresh = list_all_or_empty(store);
        let n = fresh.len();
        *self.records.write() = fresh;
        n
    }

    pub fn refresh(&self, store: &dyn ActivityStore) -> usize {
        self.load(store)
    }

    /// Put a just-recorded activity at the front.
    pub fn push_recorded(&self, record: ActivityRecord) {
        self.records.write().insert(0, record);
    }

    /// Delete `session_id`'s records from the store and empty the cache.
    pub fn clear(&self, store: &dyn ActivityStore, session_id: &str) -> usize {
        let _loading = self.begin_load();
        let deleted = delete_session_or_log(store, session_id);
        self.records.write().clear();
        deleted
    }

    pub fn snapshot(&self) -> Vec<ActivityRecord> {
        self.records.read().clone()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn for_session(&self, session_id: &str) -> Vec<ActivityRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn by_type(&self, kind: EventType) -> Vec<ActivityRecord> {
        self.records
            .read()
            .iter()
            .filter(|r| r.event_type() == kind)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{MemoryActivityStore, UnavailableStore};
    use crate::models::activity::EventData;
    use crate::models::payload::EventPayload;

    fn rec(id: &str, session: &str, ts: i64) -> ActivityRecord {
        ActivityRecord {
            id: id.into(),
            user_id: None,
            event_data: EventData::new(EventPayload::empty(EventType::Click)),
            timestamp: ts,
            session_id: session.into(),
            page: "/".into(),
        }
    }

    #[test]
    fn load_replaces_and_clears_loading_flag() {
        let store = MemoryActivityStore::new();
        store.insert(&rec("a", "S", 1)).unwrap();
        store.insert(&rec("b", "S", 2)).unwrap();

        let cache = ActivityCache::new();
        assert!(cache.is_loading());
        assert_eq!(cache.load(&store), 2);
        assert!(!cache.is_loading());
        assert_eq!(cache.snapshot()[0].id, "b");
    }

    #[test]
    fn push_prepends() {
        let cache = ActivityCache::new();
        cache.push_recorded(rec("a", "S", 1));
        cache.push_recorded(rec("b", "S", 2));
        let ids: Vec<String> = cache.snapshot().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["b", "a"]);
    }

    #[test]
    fn clear_deletes_only_the_session_and_empties_the_cache() {
        let store = MemoryActivityStore::new();
        store.insert(&rec("a", "A", 1)).unwrap();
        store.insert(&rec("b", "B", 2)).unwrap();

        let cache = ActivityCache::new();
        cache.load(&store);
        assert_eq!(cache.clear(&store, "A"), 1);
        assert!(cache.is_empty());
        assert!(!cache.is_loading());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn failing_backend_loads_as_empty() {
        let cache = ActivityCache::new();
        cache.push_recorded(rec("stale", "S", 1));
        assert_eq!(cache.load(&UnavailableStore::new("offline")), 0);
        assert!(cache.is_empty());
    }

    #[test]
    fn filters_by_session_and_type() {
        let cache = ActivityCache::new();
        cache.push_recorded(rec("a", "A", 1));
        cache.push_recorded(rec("b", "B", 2));
        assert_eq!(cache.for_session("A").len(), 1);
        assert_eq!(cache.by_type(EventType::Click).len(), 2);
        assert!(cache.by_type(EventType::Scroll).is_empty());
    }
}
