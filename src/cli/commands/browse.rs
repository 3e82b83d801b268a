use crate::cli::commands::{audit, report_recorded};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::event_type::EventType;
use crate::models::payload::Fields;
use crate::tracking::instrument::DwellTracker;
use crate::tracking::{ActivityTracker, ScrollMetrics};
use crate::ui::messages::info;
use crate::utils::formatting::secs2readable;
use crate::utils::time::{Clock, ManualClock, SystemClock};
use serde_json::Value;
use std::sync::Arc;

/// Replay one page visit on a simulated clock: a page view, then the scroll
/// positions one second apart, then `ticks` dwell samples `interval` apart.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Browse {
        page,
        scroll,
        ticks,
        interval,
        policy,
        height,
        viewport,
    } = cmd
    {
        let clock = Arc::new(ManualClock::new(SystemClock.now_millis()));
        let mut tracker = ActivityTracker::from_config_with_clock(cfg, None, clock.clone());
        if let Some(p) = policy {
            tracker.settings_mut().threshold_policy = *p;
        }
        let interval_secs = interval.unwrap_or(cfg.dwell_interval_seconds).max(1);

        //
        // 1) PAGE VIEW + SCROLL INSTRUMENTATION
        //
        let visit = tracker.start_page_view(page, false);
        let mut fields = Fields::new();
        fields.insert("page".into(), Value::from(tracker.page().path()));
        let record = tracker.track_event(EventType::PageView, fields);
        report_recorded(&tracker, &record);

        //
        // 2) SCROLL POSITIONS
        //
        for pct in scroll {
            clock.advance_secs(1);
            tracker
                .page()
                .dispatch_scroll(ScrollMetrics::at_percentage(*pct, *height, *viewport));
        }
        let max_depth = visit.scroll.max_depth();

        //
        // 3) DWELL SAMPLES
        //
        let mut dwell = DwellTracker::new(Arc::clone(tracker.recorder()), interval_secs);
        let mut total = 0;
        for _ in 0..*ticks {
            clock.advance_secs(interval_secs as i64);
            total = dwell.tick().total_time_on_page.unwrap_or(total);
        }

        visit.end();

        let scroll_events = tracker
            .current_session_activities()
            .iter()
            .filter(|r| r.event_type() == EventType::Scroll && r.page == tracker.page().path())
            .count();

        info(format!(
            "Visit of {}: max scroll depth {:.0}%, {} scroll event(s) in session, {} dwell sample(s), {} on page",
            tracker.page().path(),
            max_depth,
            scroll_events,
            ticks,
            secs2readable(total)
        ));

        audit(
            cfg,
            "browse",
            &tracker.page().path(),
            &format!("{} scroll position(s), {} dwell sample(s)", scroll.len(), ticks),
        );
    }

    Ok(())
}
