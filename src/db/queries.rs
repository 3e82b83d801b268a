//! SQL against `user_activities`.

use crate::errors::AppResult;
use crate::models::activity::{ActivityRecord, EventData};
use crate::models::event_type::EventType;
use crate::utils::time::{iso_to_millis, millis_to_iso};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde_json::Value;

const SELECT_COLUMNS: &str =
    "SELECT id, session_id, event_type, event_data, timestamp, page, user_id FROM user_activities";

const NEWEST_FIRST: &str = "ORDER BY timestamp DESC, rowid DESC";

/// Raw row, before the text columns are interpreted.
struct RawActivity {
    id: String,
    session_id: String,
    event_type: String,
    event_data: String,
    timestamp: String,
    page: Option<String>,
    user_id: Option<String>,
}

fn map_row(row: &Row<'_>) -> rusqlite::Result<RawActivity> {
    Ok(RawActivity {
        id: row.get(0)?,
        session_id: row.get(1)?,
        event_type: row.get(2)?,
        event_data: row.get(3)?,
        timestamp: row.get(4)?,
        page: row.get(5)?,
        user_id: row.get(6)?,
    })
}

/// Interpret a row. Unknown kinds and unreadable timestamps make the row
/// unusable (`None`); unreadable `event_data` decodes as empty data.
fn decode(raw: RawActivity) -> Option<ActivityRecord> {
    let Some(kind) = EventType::from_db_str(&raw.event_type) else {
        tracing::warn!(id = %raw.id, event_type = %raw.event_type, "skipping activity with unknown event type");
        return None;
    };

    let timestamp = match iso_to_millis(&raw.timestamp) {
        Ok(ms) => ms,
        Err(e) => {
            tracing::warn!(id = %raw.id, error = %e, "skipping activity with unreadable timestamp");
            return None;
        }
    };

    let data = match serde_json::from_str::<Value>(&raw.event_data) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(id = %raw.id, error = %e, "event data is not valid JSON, using empty data");
            Value::Null
        }
    };

    Some(ActivityRecord {
        id: raw.id,
        user_id: raw.user_id,
        event_data: EventData::from_json(kind, data),
        timestamp,
        session_id: raw.session_id,
        page: raw.page.unwrap_or_default(),
    })
}

fn collect(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> AppResult<Vec<ActivityRecord>> {
    let mut stmt = conn.prepare_cached(sql)?;
    let rows = stmt.query_map(params, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        if let Some(record) = decode(r?) {
            out.push(record);
        }
    }
    Ok(out)
}

pub fn insert_activity(conn: &Connection, record: &ActivityRecord) -> AppResult<()> {
    let data = serde_json::to_string(&record.event_data.to_json())?;

    conn.prepare_cached(
        "INSERT INTO user_activities (id, session_id, event_type, event_data, timestamp, page, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?
    .execute(params![
        record.id,
        record.session_id,
        record.event_type().to_db_str(),
        data,
        millis_to_iso(record.timestamp),
        record.page,
        record.user_id,
    ])?;

    Ok(())
}

pub fn load_all(conn: &Connection) -> AppResult<Vec<ActivityRecord>> {
    collect(conn, &format!("{SELECT_COLUMNS} {NEWEST_FIRST}"), [])
}

pub fn load_by_type(conn: &Connection, kind: EventType) -> AppResult<Vec<ActivityRecord>> {
    collect(
        conn,
        &format!("{SELECT_COLUMNS} WHERE event_type = ?1 {NEWEST_FIRST}"),
        [kind.to_db_str()],
    )
}

pub fn load_by_session(conn: &Connection, session_id: &str) -> AppResult<Vec<ActivityRecord>> {
    collect(
        conn,
        &format!("{SELECT_COLUMNS} WHERE session_id = ?1 {NEWEST_FIRST}"),
        [session_id],
    )
}

pub fn delete_by_session(conn: &Connection, session_id: &str) -> AppResult<usize> {
    let n = conn.execute(
        "DELETE FROM user_activities WHERE session_id = ?1",
        [session_id],
    )?;
    Ok(n)
}

/// Aggregate counters shown by `db --info`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActivityTotals {
    pub events: i64,
    pub sessions: i64,
    pub first: Option<String>,
    pub last: Option<String>,
}

pub fn totals(conn: &Connection) -> AppResult<ActivityTotals> {
    let (events, sessions): (i64, i64) = conn.query_row(
        "SELECT COUNT(*), COUNT(DISTINCT session_id) FROM user_activities",
        [],
        |row| Ok((row.get(0)?, row.get(1)?)),
    )?;

    let (first, last): (Option<String>, Option<String>) = conn
        .query_row(
            "SELECT MIN(timestamp), MAX(timestamp) FROM user_activities",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?
        .unwrap_or((None, None));

    Ok(ActivityTotals {
        events,
        sessions,
        first,
        last,
    })
}
