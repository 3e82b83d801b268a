// src/export/model.rs

use crate::models::activity::ActivityRecord;
use serde::Serialize;

/// Flat row for CSV: `event_data` is carried as a JSON string.
#[derive(Serialize, Clone, Debug)]
pub struct ActivityExport {
    pub id: String,
    pub timestamp: String,
    pub event_type: String,
    pub session_id: String,
    pub page: String,
    pub user_id: String,
    pub event_data: String,
}

impl From<&ActivityRecord> for ActivityExport {
    fn from(r: &ActivityRecord) -> Self {
        Self {
            id: r.id.clone(),
            timestamp: r.timestamp_iso(),
            event_type: r.event_type().to_string(),
            session_id: r.session_id.clone(),
            page: r.page.clone(),
            user_id: r.user_id.clone().unwrap_or_default(),
            event_data: serde_json::to_string(&r.event_data.to_json()).unwrap_or_else(|_| "{}".into()),
        }
    }
}
