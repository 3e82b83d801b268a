//! Application-level tracking facade: owns the session, the store, the
//! cache and the page context, and wires instrumentation to page views.

use super::cache::ActivityCache;
use super::instrument::{DwellGuard, ScrollGuard, ThresholdPolicy, start_dwell_tracking, start_scroll_tracking};
use super::page::PageContext;
use super::recorder::EventRecorder;
use super::session::{FileSessionStorage, SessionContext, SessionIdentity};
use crate::config::{Config, DEFAULT_THRESHOLDS};
use crate::db::memory::UnavailableStore;
use crate::db::sqlite_store::SqliteActivityStore;
use crate::db::store::{ActivityStore, list_by_session_or_empty};
use crate::models::activity::ActivityRecord;
use crate::models::context::ClientContext;
use crate::models::event_type::EventType;
use crate::models::payload::{Fields, FormAction};
use crate::utils::time::{Clock, SystemClock};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct TrackerSettings {
    pub scroll_thresholds: Vec<u32>,
    pub threshold_policy: ThresholdPolicy,
    pub dwell_interval: Duration,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            scroll_thresholds: DEFAULT_THRESHOLDS.to_vec(),
            threshold_policy: ThresholdPolicy::Each,
            dwell_interval: Duration::from_secs(60),
        }
    }
}

impl From<&Config> for TrackerSettings {
    fn from(cfg: &Config) -> Self {
        Self {
            scroll_thresholds: cfg.scroll_thresholds.clone(),
            threshold_policy: cfg.scroll_policy,
            dwell_interval: Duration::from_secs(cfg.dwell_interval_seconds.max(1)),
        }
    }
}

/// Instrumentation bound to one page view; released when dropped.
pub struct PageVisit {
    pub scroll: ScrollGuard,
    pub dwell: Option<DwellGuard>,
}

impl PageVisit {
    pub fn end(mut self) {
        self.scroll.dispose();
        if let Some(d) = self.dwell.as_mut() {
            d.dispose();
        }
    }
}

pub struct ActivityTracker {
    recorder: Arc<EventRecorder>,
    store: Arc<dyn ActivityStore>,
    cache: ActivityCache,
    settings: TrackerSettings,
}

impl ActivityTracker {
    /// Assemble from parts and load the cache.
    pub fn new(recorder: EventRecorder, settings: TrackerSettings) -> Self {
        let store = Arc::clone(recorder.store());
        let cache = ActivityCache::new();
        cache.load(store.as_ref());
        Self {
            recorder: Arc::new(recorder),
            store,
            cache,
            settings,
        }
    }

    /// Bootstrap from configuration: SQLite store (or a degraded stand-in),
    /// file-backed session identity, terminal client context.
    pub fn from_config(cfg: &Config, user_id: Option<String>) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::from_config_with_clock(cfg, user_id, clock)
    }

    pub fn from_config_with_clock(cfg: &Config, user_id: Option<String>, clock: Arc<dyn Clock>) -> Self {
        let store: Arc<dyn ActivityStore> = match SqliteActivityStore::open(&cfg.database) {
            Ok(s) => Arc::new(s),
            Err(e) => {
                tracing::warn!(database = %cfg.database, error = %e, "activity store unavailable, tracking degrades to no-ops");
                Arc::new(UnavailableStore::new(e.to_string()))
            }
        };

        let session = SessionIdentity::resolve(
            &FileSessionStorage::new(&cfg.session_file),
            clock.as_ref(),
        );

        let recorder = EventRecorder::new(
            store,
            session,
            ClientContext::detect(&cfg.locale, &cfg.timezone),
            Arc::new(PageContext::default()),
        )
        .with_clock(clock)
        .with_user(user_id);

        Self::new(recorder, TrackerSettings::from(cfg))
    }

    pub fn recorder(&self) -> &Arc<EventRecorder> {
        &self.recorder
    }

    pub fn session(&self) -> &SessionContext {
        self.recorder.session()
    }

    pub fn session_id(&self) -> &str {
        self.recorder.session().get_session_id()
    }

    pub fn page(&self) -> &Arc<PageContext> {
        self.recorder.page()
    }

    pub fn settings(&self) -> &TrackerSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut TrackerSettings {
        &mut self.settings
    }

    pub fn store(&self) -> &Arc<dyn ActivityStore> {
        &self.store
    }

    pub fn cache(&self) -> &ActivityCache {
        &self.cache
    }

    pub fn activities(&self) -> Vec<ActivityRecord> {
        self.cache.snapshot()
    }

    pub fn is_loading(&self) -> bool {
        self.cache.is_loading()
    }

    fn keep(&self, record: ActivityRecord) -> ActivityRecord {
        self.cache.push_recorded(record.clone());
        record
    }

    pub fn track_event(&self, kind: EventType, fields: Fields) -> ActivityRecord {
        self.keep(self.recorder.record(kind, fields, None))
    }

    pub fn track_element_click(&self, element: &str, extra: Fields) -> ActivityRecord {
        self.keep(self.recorder.track_click(element, extra))
    }

    pub fn track_button_press(&self, button_name: &str, extra: Fields) -> ActivityRecord {
        self.keep(self.recorder.track_button_click(button_name, extra))
    }

    pub fn track_link_visit(&self, href: &str, link_text: &str, extra: Fields) -> ActivityRecord {
        self.keep(self.recorder.track_link_click(href, link_text, extra))
    }

    pub fn track_form(
        &self,
        form_name: &str,
        action: FormAction,
        field_name: Option<&str>,
        extra: Fields,
    ) -> ActivityRecord {
        self.keep(
            self.recorder
                .track_form_interaction(form_name, action, field_name, extra),
        )
    }

    pub fn track_element_hover(&self, element: &str, duration_ms: u64, extra: Fields) -> ActivityRecord {
        self.keep(self.recorder.track_hover(element, duration_ms, extra))
    }

    /// Delete the current session's records and empty the cache.
    pub fn clear_activities(&self) -> usize {
        self.cache.clear(self.store.as_ref(), self.session_id())
    }

    pub fn refresh_activities(&self) -> usize {
        self.cache.refresh(self.store.as_ref())
    }

    /// Current session's records, straight from the store.
    pub fn current_session_activities(&self) -> Vec<ActivityRecord> {
        list_by_session_or_empty(self.store.as_ref(), self.session_id())
    }

    /// Navigate to `path` and start scroll tracking (and, with `with_timer`,
    /// the dwell timer) for the duration of the returned visit.
    pub fn start_page_view(&self, path: &str, with_timer: bool) -> PageVisit {
        self.page().navigate(path);

        let scroll = start_scroll_tracking(
            Arc::clone(&self.recorder),
            &self.settings.scroll_thresholds,
            self.settings.threshold_policy,
        );

        let dwell = if with_timer {
            match start_dwell_tracking(Arc::clone(&self.recorder), self.settings.dwell_interval) {
                Ok(g) => Some(g),
                Err(e) => {
                    tracing::warn!(error = %e, "could not start dwell timer");
                    None
                }
            }
        } else {
            None
        };

        PageVisit { scroll, dwell }
    }
}
