use crate::cli::commands::{open_tracker, track_dashboard_click, track_dashboard_view};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::dashboard::DashboardLogic;
use crate::core::logic::Core;
use crate::errors::AppResult;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dashboard { top, refresh } = cmd {
        let tracker = open_tracker(cfg, None);
        if *refresh {
            let loaded = tracker.refresh_activities();
            tracing::debug!(loaded, "activities reloaded");
        }

        let summary = Core::build_dashboard(&tracker.activities(), top.unwrap_or(cfg.top_n));
        DashboardLogic::print(&summary);

        // rendered first, so the view itself shows up next time
        track_dashboard_view(&tracker);
        if *refresh {
            track_dashboard_click(&tracker, "refresh_activities_button");
        }
    }

    Ok(())
}
