//! One handler per subcommand, plus the bits they share.

pub mod browse;
pub mod clear;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod export;
pub mod init;
pub mod list;
pub mod log;
pub mod session;
pub mod track;

use crate::config::Config;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use crate::models::payload::Fields;
use crate::tracking::ActivityTracker;
use crate::ui::messages::{success, warning};
use serde_json::{Value, json};

/// Page the dashboard commands record their own use under.
pub(crate) const DASHBOARD_PAGE: &str = "activity_dashboard";

/// Tracker over the configured database, optionally bound to a user.
pub(crate) fn open_tracker(cfg: &Config, user_id: Option<String>) -> ActivityTracker {
    ActivityTracker::from_config(cfg, user_id)
}

/// `--data` must be a JSON object; absent means an empty payload.
pub(crate) fn parse_data(data: &Option<String>) -> AppResult<Fields> {
    let Some(raw) = data else {
        return Ok(Fields::new());
    };
    match serde_json::from_str::<Value>(raw)? {
        Value::Object(map) => Ok(map),
        other => Err(AppError::InvalidPayload(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

/// Confirmation line for a recorded event; flags it when nothing was persisted.
pub(crate) fn report_recorded(tracker: &ActivityTracker, record: &ActivityRecord) {
    if tracker.store().backend() == "unavailable" {
        warning(format!(
            "{} on {} was not persisted (database unavailable)",
            record.event_type(),
            record.page
        ));
        return;
    }
    success(format!(
        "Recorded {} on {} ({})",
        record.event_type(),
        record.page,
        record.id
    ));
}

/// The dashboard tracks its own use: a view on open, a click per control.
pub(crate) fn track_dashboard_view(tracker: &ActivityTracker) {
    tracker.page().navigate(DASHBOARD_PAGE);
    let fields = match json!({ "page": DASHBOARD_PAGE }) {
        Value::Object(map) => map,
        _ => Fields::new(),
    };
    tracker.track_event(EventType::PageView, fields);
}

pub(crate) fn track_dashboard_click(tracker: &ActivityTracker, control: &str) {
    tracker.page().navigate(DASHBOARD_PAGE);
    tracker.track_element_click(control, Fields::new());
}

/// Internal log line. Failures are reported, never fatal.
pub(crate) fn audit(cfg: &Config, operation: &str, target: &str, message: &str) {
    let written = DbPool::open(&cfg.database).and_then(|pool| ttlog(&pool.conn, operation, target, message));
    if let Err(e) = written {
        tracing::warn!(operation, error = %e, "failed to write internal log");
    }
}
