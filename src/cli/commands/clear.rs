use crate::cli::commands::{audit, open_tracker, track_dashboard_click};
use crate::config::Config;
use crate::errors::AppResult;
use crate::ui::messages::success;

/// Delete the current session's activities. Other sessions are untouched.
pub fn handle(cfg: &Config) -> AppResult<()> {
    let tracker = open_tracker(cfg, None);
    let session_id = tracker.session_id().to_string();
    let removed = tracker.clear_activities();

    success(format!("Removed {removed} activities of session {session_id}"));
    track_dashboard_click(&tracker, "clear_activities_button");

    audit(cfg, "clear", &session_id, &format!("{removed} activities removed"));
    Ok(())
}
