use crate::cli::commands::open_tracker;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::aggregator::chronological_table;
use crate::core::dashboard::print_events;
use crate::db::store::list_by_type_or_empty;
use crate::errors::AppResult;
use crate::models::event_type::EventType;
use crate::ui::messages::header;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { kind, session } = cmd {
        let kind: Option<EventType> = kind.as_deref().map(str::parse::<EventType>).transpose()?;
        let tracker = open_tracker(cfg, None);

        let mut records = match (kind, *session) {
            (Some(k), false) => list_by_type_or_empty(tracker.store().as_ref(), k),
            (_, true) => tracker.current_session_activities(),
            (None, false) => tracker.activities(),
        };
        if let Some(k) = kind {
            records.retain(|r| r.event_type() == k);
        }

        match (kind, *session) {
            (Some(k), true) => header(format!("{} events, session {}", k.label(), tracker.session_id())),
            (Some(k), false) => header(format!("{} events", k.label())),
            (None, true) => header(format!("Session {}", tracker.session_id())),
            (None, false) => header("All activities"),
        }

        print_events(&chronological_table(&records));
    }

    Ok(())
}
