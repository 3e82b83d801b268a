use super::pool::DbPool;
use super::queries;
use super::store::ActivityStore;
use crate::errors::AppResult;
use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use parking_lot::Mutex;
use rusqlite::Connection;

/// `user_activities` in a SQLite file, behind one serialized connection.
pub struct SqliteActivityStore {
    conn: Mutex<Connection>,
}

impl SqliteActivityStore {
    pub fn open(path: &str) -> AppResult<Self> {
        Ok(Self::from_pool(DbPool::open(path)?))
    }

    pub fn in_memory() -> AppResult<Self> {
        Ok(Self::from_pool(DbPool::in_memory()?))
    }

    /// The pool's schema must already be initialized.
    pub fn from_pool(pool: DbPool) -> Self {
        Self {
            conn: Mutex::new(pool.conn),
        }
    }

    /// Run `f` against the underlying connection (audit log, stats).
    pub fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> AppResult<T>) -> AppResult<T> {
        let conn = self.conn.lock();
        f(&conn)
    }
}

impl ActivityStore for SqliteActivityStore {
    fn backend(&self) -> &'static str {
        "sqlite"
    }

    fn insert(&self, record: &ActivityRecord) -> AppResult<()> {
        queries::insert_activity(&self.conn.lock(), record)
    }

    fn list_all(&self) -> AppResult<Vec<ActivityRecord>> {
        queries::load_all(&self.conn.lock())
    }

    fn delete_by_session(&self, session_id: &str) -> AppResult<usize> {
        queries::delete_by_session(&self.conn.lock(), session_id)
    }

    fn list_by_type(&self, kind: EventType) -> AppResult<Vec<ActivityRecord>> {
        queries::load_by_type(&self.conn.lock(), kind)
    }

    fn list_by_session(&self, session_id: &str) -> AppResult<Vec<ActivityRecord>> {
        queries::load_by_session(&self.conn.lock(), session_id)
    }
}
