//! Builds activity records, enriches them with client metadata and hands
//! them to the store.
//!
//! Recording never fails from the caller's point of view: a store error is
//! logged and the constructed record is returned anyway.

use super::page::PageContext;
use super::session::SessionContext;
use crate::db::store::{ActivityStore, insert_or_log};
use crate::models::activity::{ActivityRecord, EventData};
use crate::models::context::ClientContext;
use crate::models::event_type::EventType;
use crate::models::payload::{EventPayload, Fields, FormAction, TimeSpent};
use crate::utils::ids::activity_id;
use crate::utils::time::{Clock, SystemClock};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct EventRecorder {
    store: Arc<dyn ActivityStore>,
    session: SessionContext,
    client: ClientContext,
    page: Arc<PageContext>,
    clock: Arc<dyn Clock>,
    user_id: Option<String>,
    last_timestamp: AtomicI64,
}

impl EventRecorder {
    pub fn new(
        store: Arc<dyn ActivityStore>,
        session: SessionContext,
        client: ClientContext,
        page: Arc<PageContext>,
    ) -> Self {
        Self {
            store,
            session,
            client,
            page,
            clock: Arc::new(SystemClock),
            user_id: None,
            last_timestamp: AtomicI64::new(i64::MIN),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Default `user_id` attached when a call does not name one.
    pub fn with_user(mut self, user_id: Option<String>) -> Self {
        self.user_id = user_id.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn session(&self) -> &SessionContext {
        &self.session
    }

    pub fn page(&self) -> &Arc<PageContext> {
        &self.page
    }

    pub fn clock(&self) -> &Arc<dyn Clock> {
        &self.clock
    }

    pub fn store(&self) -> &Arc<dyn ActivityStore> {
        &self.store
    }

    /// Record `kind` with an open payload map.
    pub fn record(&self, kind: EventType, fields: Fields, user_id: Option<&str>) -> ActivityRecord {
        self.record_data(EventData::from_fields(kind, fields), user_id)
    }

    /// Record a typed payload; the kind follows from the payload.
    pub fn track(&self, payload: EventPayload, user_id: Option<&str>) -> ActivityRecord {
        self.record_data(EventData::new(payload), user_id)
    }

    pub fn record_data(&self, mut data: EventData, user_id: Option<&str>) -> ActivityRecord {
        data.enrich(&self.client);

        let timestamp = self.next_timestamp();
        let record = ActivityRecord {
            id: activity_id(timestamp),
            user_id: user_id
                .map(str::to_string)
                .or_else(|| self.user_id.clone()),
            event_data: data,
            timestamp,
            session_id: self.session.get_session_id().to_string(),
            page: self.page.path(),
        };

        insert_or_log(self.store.as_ref(), &record);
        record
    }

    /// Client clock, never going backwards within this recorder.
    fn next_timestamp(&self) -> i64 {
        let now = self.clock.now_millis();
        let prev = self.last_timestamp.fetch_max(now, Ordering::SeqCst);
        prev.max(now)
    }

    pub fn track_click(&self, element: &str, extra: Fields) -> ActivityRecord {
        self.record(
            EventType::Click,
            with_extra(json!({ "element": element }), extra),
            None,
        )
    }

    pub fn track_button_click(&self, button_name: &str, extra: Fields) -> ActivityRecord {
        self.record(
            EventType::ButtonClick,
            with_extra(json!({ "buttonName": button_name }), extra),
            None,
        )
    }

    pub fn track_link_click(&self, href: &str, link_text: &str, extra: Fields) -> ActivityRecord {
        self.record(
            EventType::LinkClick,
            with_extra(json!({ "href": href, "linkText": link_text }), extra),
            None,
        )
    }

    pub fn track_form_interaction(
        &self,
        form_name: &str,
        action: FormAction,
        field_name: Option<&str>,
        extra: Fields,
    ) -> ActivityRecord {
        let mut base = json!({ "formName": form_name, "action": action.as_str() });
        if let Some(field) = field_name {
            base["fieldName"] = Value::from(field);
        }
        self.record(EventType::FormInteraction, with_extra(base, extra), None)
    }

    pub fn track_hover(&self, element: &str, duration_ms: u64, extra: Fields) -> ActivityRecord {
        self.record(
            EventType::Hover,
            with_extra(json!({ "element": element, "durationMs": duration_ms }), extra),
            None,
        )
    }

    /// Scroll milestone: `depth` is the threshold, `previous_max_depth` the
    /// high-water mark before it was crossed.
    pub fn track_scroll(&self, depth: u32, previous_max_depth: f64) -> ActivityRecord {
        self.record(
            EventType::Scroll,
            with_extra(
                json!({ "depth": depth, "previousMaxDepth": previous_max_depth }),
                Fields::new(),
            ),
            None,
        )
    }

    pub fn track_time_spent(&self, sample: TimeSpent) -> ActivityRecord {
        self.track(EventPayload::TimeSpent(sample), None)
    }
}

/// `base` with `extra` merged over it. Caller-supplied keys win.
fn with_extra(base: Value, extra: Fields) -> Fields {
    let mut fields = match base {
        Value::Object(map) => map,
        _ => Fields::new(),
    };
    fields.extend(extra);
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::{MemoryActivityStore, UnavailableStore};
    use crate::models::activity::DEVICE_INFO_KEY;
    use crate::utils::time::ManualClock;

    fn recorder(store: Arc<dyn ActivityStore>, clock: Arc<ManualClock>) -> EventRecorder {
        EventRecorder::new(
            store,
            SessionContext::fixed("session_1_aaaaaaa"),
            ClientContext::detect("en-US", "UTC"),
            Arc::new(PageContext::new("/products")),
        )
        .with_clock(clock)
    }

    #[test]
    fn record_is_built_enriched_and_stored() {
        let store = Arc::new(MemoryActivityStore::new());
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));
        let rec = recorder(store.clone(), clock);

        let r = rec.record(
            EventType::Search,
            with_extra(json!({"searchTerm": "lamp", "resultsCount": 1}), Fields::new()),
            Some("user-7"),
        );

        assert!(r.id.starts_with("activity_1700000000000_"));
        assert_eq!(r.session_id, "session_1_aaaaaaa");
        assert_eq!(r.page, "/products");
        assert_eq!(r.user_id.as_deref(), Some("user-7"));
        assert_eq!(r.event_type(), EventType::Search);
        assert!(r.event_data.to_fields().contains_key(DEVICE_INFO_KEY));

        let stored = store.list_all().unwrap();
        assert_eq!(stored, vec![r]);
    }

    #[test]
    fn wrappers_produce_their_event_type() {
        let store = Arc::new(MemoryActivityStore::new());
        let rec = recorder(store, Arc::new(ManualClock::new(0)));

        assert_eq!(rec.track_click("logo", Fields::new()).event_type(), EventType::Click);
        assert_eq!(rec.track_button_click("buy", Fields::new()).event_type(), EventType::ButtonClick);
        assert_eq!(rec.track_link_click("/about", "About", Fields::new()).event_type(), EventType::LinkClick);
        assert_eq!(
            rec.track_form_interaction("newsletter", FormAction::Focus, Some("email"), Fields::new())
                .event_type(),
            EventType::FormInteraction
        );
        assert_eq!(rec.track_hover("card", 300, Fields::new()).event_type(), EventType::Hover);
        assert_eq!(rec.track_scroll(25, 0.0).event_type(), EventType::Scroll);
        assert_eq!(rec.track_time_spent(TimeSpent::default()).event_type(), EventType::TimeSpent);
    }

    #[test]
    fn caller_extra_fields_win_over_wrapper_fields() {
        let rec = recorder(Arc::new(MemoryActivityStore::new()), Arc::new(ManualClock::new(0)));
        let mut extra = Fields::new();
        extra.insert("element".into(), json!("custom"));
        extra.insert("position".into(), json!("header"));

        let out = rec.track_click("logo", extra).event_data.to_fields();
        assert_eq!(out["element"], json!("custom"));
        assert_eq!(out["position"], json!("header"));
    }

    #[test]
    fn write_failure_still_returns_the_record() {
        let rec = recorder(Arc::new(UnavailableStore::new("offline")), Arc::new(ManualClock::new(5)));
        let r = rec.track_click("logo", Fields::new());
        assert_eq!(r.event_type(), EventType::Click);
        assert_eq!(r.timestamp, 5);
    }

    #[test]
    fn timestamps_never_go_backwards() {
        let clock = Arc::new(ManualClock::new(10_000));
        let rec = recorder(Arc::new(MemoryActivityStore::new()), clock.clone());
        let a = rec.track_click("a", Fields::new());
        clock.set(9_000);
        let b = rec.track_click("b", Fields::new());
        assert!(b.timestamp >= a.timestamp);
    }

    #[test]
    fn default_user_applies_when_none_is_given() {
        let rec = recorder(Arc::new(MemoryActivityStore::new()), Arc::new(ManualClock::new(0)))
            .with_user(Some("user-1".into()));
        assert_eq!(rec.track_click("x", Fields::new()).user_id.as_deref(), Some("user-1"));
        let r = rec.record(EventType::Click, Fields::new(), Some("user-2"));
        assert_eq!(r.user_id.as_deref(), Some("user-2"));
    }
}
