use rusqlite::{Connection, OptionalExtension, Result};

/// Ensure that the `log` table exists with the modern schema.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Check if the given table exists.
pub fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn is_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_applied(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// Create the `user_activities` table.
fn create_user_activities(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS user_activities (
            id          TEXT PRIMARY KEY,
            session_id  TEXT NOT NULL,
            event_type  TEXT NOT NULL,
            event_data  TEXT NOT NULL DEFAULT '{}',
            timestamp   TEXT NOT NULL,
            page        TEXT NOT NULL DEFAULT '/',
            user_id     TEXT
        );
        "#,
    )
}

fn create_user_activities_indexes(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE INDEX IF NOT EXISTS idx_user_activities_timestamp  ON user_activities(timestamp);
        CREATE INDEX IF NOT EXISTS idx_user_activities_session_id ON user_activities(session_id);
        CREATE INDEX IF NOT EXISTS idx_user_activities_event_type ON user_activities(event_type);
        "#,
    )
}

struct Migration {
    version: &'static str,
    message: &'static str,
    apply: fn(&Connection) -> Result<()>,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20250901_0001_create_user_activities",
        message: "Created user_activities table",
        apply: create_user_activities,
    },
    Migration {
        version: "20250901_0002_user_activities_indexes",
        message: "Indexed user_activities on timestamp, session_id and event_type",
        apply: create_user_activities_indexes,
    },
];

/// Public entry point: run all pending migrations.
///
/// Returns the versions applied by this call (empty when up to date).
pub fn run_pending_migrations(conn: &Connection) -> Result<Vec<&'static str>> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Apply, in order, what is not marked yet
    let mut applied = Vec::new();
    for m in MIGRATIONS {
        if is_applied(conn, m.version)? {
            continue;
        }

        let tx = conn.unchecked_transaction()?;
        (m.apply)(&tx)?;
        mark_applied(&tx, m.version, m.message)?;
        tx.commit()?;

        tracing::info!(version = m.version, "migration applied");
        applied.push(m.version);
    }

    // 3) Repair indexes dropped by hand
    if table_exists(conn, "user_activities")? {
        create_user_activities_indexes(conn)?;
    }

    Ok(applied)
}
