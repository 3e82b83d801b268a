use crate::cli::commands::{audit, open_tracker, track_dashboard_click};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::export::ExportLogic;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Export {
        format,
        file,
        force,
        session,
    } = cmd
    {
        let tracker = open_tracker(cfg, None);
        let records = if *session {
            tracker.current_session_activities()
        } else {
            tracker.activities()
        };

        let path = ExportLogic::resolve_path(*format, file)?;
        ExportLogic::export(&records, *format, &path, *force)?;
        track_dashboard_click(&tracker, "download_activities_button");

        audit(
            cfg,
            "export",
            &path.display().to_string(),
            &format!("{} activities exported as {}", records.len(), format.as_str()),
        );
    }

    Ok(())
}
