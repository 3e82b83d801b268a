//! Health checks and housekeeping for the activity database.

use crate::db::migrate::table_exists;
use crate::errors::AppResult;
use crate::models::event_type::EventType;
use rusqlite::Connection;
use serde_json::Value;

/// Outcome of `db --check`.
#[derive(Debug, Default, PartialEq)]
pub struct HealthReport {
    /// SQLite `integrity_check` messages; empty when the file is sound.
    pub integrity: Vec<String>,
    /// Rows whose `event_type` is not a known kind (hidden from every list).
    pub unknown_types: usize,
    /// Rows whose `event_data` is not valid JSON (read back as empty data).
    pub bad_data: usize,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.integrity.is_empty() && self.unknown_types == 0 && self.bad_data == 0
    }
}

pub fn check_health(conn: &Connection) -> AppResult<HealthReport> {
    let mut report = HealthReport::default();

    let mut stmt = conn.prepare("PRAGMA integrity_check;")?;
    for line in stmt.query_map([], |row| row.get::<_, String>(0))? {
        let line = line?;
        if line != "ok" {
            report.integrity.push(line);
        }
    }

    if !table_exists(conn, "user_activities")? {
        return Ok(report);
    }

    let mut stmt = conn.prepare("SELECT event_type, event_data FROM user_activities")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?;
    for row in rows {
        let (kind, data) = row?;
        if EventType::from_db_str(&kind).is_none() {
            report.unknown_types += 1;
        }
        if serde_json::from_str::<Value>(&data).is_err() {
            report.bad_data += 1;
        }
    }

    Ok(report)
}

/// Rebuild the file; returns its page count before and after.
pub fn vacuum(conn: &Connection) -> AppResult<(i64, i64)> {
    let pages = |c: &Connection| c.query_row("PRAGMA page_count;", [], |row| row.get::<_, i64>(0));
    let before = pages(conn)?;
    conn.execute_batch("VACUUM;")?;
    Ok((before, pages(conn)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::pool::DbPool;

    #[test]
    fn fresh_database_is_healthy() {
        let pool = DbPool::in_memory().unwrap();
        let report = check_health(&pool.conn).unwrap();
        assert!(report.is_healthy(), "{report:?}");
    }

    #[test]
    fn flags_unknown_types_and_broken_data() {
        let pool = DbPool::in_memory().unwrap();
        pool.conn
            .execute_batch(
                "INSERT INTO user_activities (id, session_id, event_type, event_data, timestamp, page)
                 VALUES ('a1', 's', 'teleport', '{}', '2025-09-01T08:30:00.000Z', '/'),
                        ('a2', 's', 'click', '{oops', '2025-09-01T08:30:01.000Z', '/'),
                        ('a3', 's', 'click', '{}', '2025-09-01T08:30:02.000Z', '/');",
            )
            .unwrap();

        let report = check_health(&pool.conn).unwrap();
        assert_eq!(report.unknown_types, 1);
        assert_eq!(report.bad_data, 1);
        assert!(report.integrity.is_empty());
        assert!(!report.is_healthy());
    }

    #[test]
    fn vacuum_reports_page_counts() {
        let pool = DbPool::in_memory().unwrap();
        let (before, after) = vacuum(&pool.conn).unwrap();
        assert!(before > 0);
        assert!(after <= before);
    }
}
