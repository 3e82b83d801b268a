use crate::cli::commands::{open_tracker, parse_data, report_recorded};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::event_type::EventType;
use crate::models::payload::{Fields, FormAction};
use crate::tracking::ActivityTracker;

fn at_page(tracker: &ActivityTracker, page: &Option<String>) {
    if let Some(p) = page {
        tracker.page().navigate(p);
    }
}

/// Handle every recording subcommand: `track` and the interaction shortcuts.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    match cmd {
        Commands::Track {
            kind,
            data,
            page,
            user,
        } => {
            let kind: EventType = kind.parse()?;
            let fields = parse_data(data)?;
            let tracker = open_tracker(cfg, user.clone());
            at_page(&tracker, page);
            let record = tracker.track_event(kind, fields);
            report_recorded(&tracker, &record);
        }

        Commands::Click { element, page } => {
            let tracker = open_tracker(cfg, None);
            at_page(&tracker, page);
            let record = tracker.track_element_click(element, Fields::new());
            report_recorded(&tracker, &record);
        }

        Commands::Button { name, page } => {
            let tracker = open_tracker(cfg, None);
            at_page(&tracker, page);
            let record = tracker.track_button_press(name, Fields::new());
            report_recorded(&tracker, &record);
        }

        Commands::Link { href, text, page } => {
            let tracker = open_tracker(cfg, None);
            at_page(&tracker, page);
            let record = tracker.track_link_visit(href, text, Fields::new());
            report_recorded(&tracker, &record);
        }

        Commands::Form {
            name,
            action,
            field,
            page,
        } => {
            let action: FormAction = action.parse()?;
            let tracker = open_tracker(cfg, None);
            at_page(&tracker, page);
            let record = tracker.track_form(name, action, field.as_deref(), Fields::new());
            report_recorded(&tracker, &record);
        }

        Commands::Hover {
            element,
            duration,
            page,
        } => {
            let tracker = open_tracker(cfg, None);
            at_page(&tracker, page);
            let record = tracker.track_element_hover(element, *duration, Fields::new());
            report_recorded(&tracker, &record);
        }

        _ => {}
    }

    Ok(())
}
