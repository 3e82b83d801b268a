use serde_json::{Value, json};
use std::sync::Arc;
use trackify::core::aggregator::{cart_activity_by_product, top_product_views, type_histogram};
use trackify::core::logic::Core;
use trackify::db::{ActivityStore, MemoryActivityStore, SqliteActivityStore, UnavailableStore};
use trackify::models::context::ClientContext;
use trackify::models::event_type::EventType;
use trackify::models::payload::Fields;
use trackify::tracking::instrument::ThresholdPolicy;
use trackify::tracking::session::MemorySessionStorage;
use trackify::tracking::{
    ActivityTracker, EventRecorder, PageContext, ScrollMetrics, SessionContext, SessionIdentity,
    TrackerSettings,
};
use trackify::utils::time::{Clock, ManualClock};

const START: i64 = 1_756_715_400_000;

fn fields(v: Value) -> Fields {
    match v {
        Value::Object(m) => m,
        _ => Fields::new(),
    }
}

fn tracker_with(store: Arc<dyn ActivityStore>, session: &str, clock: Arc<ManualClock>, policy: ThresholdPolicy) -> ActivityTracker {
    let recorder = EventRecorder::new(
        store,
        SessionContext::fixed(session),
        ClientContext::detect("en-US", "UTC"),
        Arc::new(PageContext::default()),
    )
    .with_clock(clock);

    ActivityTracker::new(
        recorder,
        TrackerSettings {
            threshold_policy: policy,
            ..TrackerSettings::default()
        },
    )
}

fn scroll_depths(tracker: &ActivityTracker) -> Vec<i64> {
    let mut scrolls = tracker.current_session_activities();
    scrolls.retain(|r| r.event_type() == EventType::Scroll);
    scrolls.reverse();
    scrolls
        .iter()
        .map(|r| r.event_data.to_json()["depth"].as_i64().unwrap())
        .collect()
}

#[test]
fn recorded_events_carry_the_identity_session_id() {
    let clock = Arc::new(ManualClock::new(START));
    let identity = SessionIdentity::new(Box::new(MemorySessionStorage::default()), clock.clone());
    let first = identity.get_session_id();
    assert_eq!(first, identity.get_session_id());

    let store: Arc<dyn ActivityStore> = Arc::new(MemoryActivityStore::new());
    let recorder = EventRecorder::new(
        store,
        identity.context().clone(),
        ClientContext::detect("en-US", "UTC"),
        Arc::new(PageContext::new("/home")),
    )
    .with_clock(clock);

    let record = recorder.record(EventType::PageView, Fields::new(), Some("u-42"));
    assert_eq!(record.session_id, first);
    assert_eq!(record.page, "/home");
    assert_eq!(record.user_id.as_deref(), Some("u-42"));
    assert_eq!(record.timestamp, START);
    assert!(record.id.starts_with(&format!("activity_{START}_")));
}

#[test]
fn deepest_policy_reports_the_highest_threshold_crossed() {
    let clock = Arc::new(ManualClock::new(START));
    let tracker = tracker_with(Arc::new(MemoryActivityStore::new()), "session_1_aaaaaaa", clock.clone(), ThresholdPolicy::Deepest);

    let visit = tracker.start_page_view("/products", false);
    for pct in [30.0, 80.0] {
        clock.advance_secs(1);
        tracker
            .page()
            .dispatch_scroll(ScrollMetrics::at_percentage(pct, 3000.0, 1000.0));
    }
    visit.end();

    assert_eq!(scroll_depths(&tracker), vec![25, 75]);
}

#[test]
fn each_policy_reports_every_threshold_once() {
    let clock = Arc::new(ManualClock::new(START));
    let tracker = tracker_with(Arc::new(MemoryActivityStore::new()), "session_1_aaaaaaa", clock.clone(), ThresholdPolicy::Each);

    let visit = tracker.start_page_view("/products", false);
    for pct in [30.0, 80.0, 60.0, 80.0, 100.0] {
        tracker
            .page()
            .dispatch_scroll(ScrollMetrics::at_percentage(pct, 3000.0, 1000.0));
    }
    assert_eq!(tracker.page().listener_count(), 1);
    visit.end();
    assert_eq!(tracker.page().listener_count(), 0);

    // after the visit ends nothing more is recorded
    tracker
        .page()
        .dispatch_scroll(ScrollMetrics::at_percentage(10.0, 3000.0, 1000.0));

    assert_eq!(scroll_depths(&tracker), vec![25, 50, 75, 100]);
}

#[test]
fn non_scrollable_page_records_nothing() {
    let clock = Arc::new(ManualClock::new(START));
    let tracker = tracker_with(Arc::new(MemoryActivityStore::new()), "session_1_aaaaaaa", clock, ThresholdPolicy::Each);

    let _visit = tracker.start_page_view("/short", false);
    tracker
        .page()
        .dispatch_scroll(ScrollMetrics::new(0.0, 800.0, 800.0));

    assert!(scroll_depths(&tracker).is_empty());
}

#[test]
fn dwell_samples_accumulate_time_on_page() {
    use trackify::tracking::instrument::DwellTracker;

    let clock = Arc::new(ManualClock::new(START));
    let tracker = tracker_with(Arc::new(MemoryActivityStore::new()), "session_1_aaaaaaa", clock.clone(), ThresholdPolicy::Each);
    tracker.page().navigate("/blog/post");

    let mut dwell = DwellTracker::new(Arc::clone(tracker.recorder()), 10);
    let totals: Vec<u64> = (0..3)
        .map(|_| {
            clock.advance_secs(10);
            dwell.tick().total_time_on_page.unwrap()
        })
        .collect();
    assert_eq!(totals, vec![10, 20, 30]);

    let samples = tracker.current_session_activities();
    assert_eq!(samples.len(), 3);
    let newest = samples[0].event_data.to_json();
    assert_eq!(newest["durationSeconds"], json!(10));
    assert_eq!(newest["totalTimeOnPage"], json!(30));
    assert_eq!(newest["trackingInterval"], json!(10));
    assert_eq!(samples[0].page, "/blog/post");
    assert_eq!(samples[0].timestamp, clock.now_millis());
}

#[test]
fn dashboard_aggregates_histogram_and_top_products() {
    let clock = Arc::new(ManualClock::new(START));
    let tracker = tracker_with(Arc::new(MemoryActivityStore::new()), "session_1_aaaaaaa", clock.clone(), ThresholdPolicy::Each);

    let views = [
        "Desk Lamp", "Oak Chair", "Desk Lamp", "Rug", "Shelf", "Vase", "Clock", "Desk Lamp", "Rug",
    ];
    for name in views {
        clock.advance_millis(5);
        tracker.track_event(EventType::ProductView, fields(json!({ "productName": name })));
    }
    tracker.track_event(EventType::AddToCart, fields(json!({ "productName": "Rug" })));
    tracker.track_event(EventType::AddToCart, fields(json!({ "productName": "Rug" })));
    tracker.track_event(EventType::RemoveFromCart, fields(json!({ "productName": "Rug" })));
    tracker.track_event(EventType::ProductView, Fields::new());

    let records = tracker.activities();
    assert_eq!(records.len(), 13);

    let hist = type_histogram(&records);
    assert_eq!(hist[0].event_type, EventType::ProductView);
    assert_eq!(hist[0].count, 10);
    assert_eq!(hist.iter().map(|t| t.count).sum::<usize>(), 13);

    let top = top_product_views(&records, 5);
    assert_eq!(top.len(), 5);
    assert_eq!(top[0].product_name, "Desk Lamp");
    assert_eq!(top[0].views, 3);
    assert_eq!(top[1].product_name, "Rug");

    let cart = cart_activity_by_product(&records, 5);
    assert_eq!((cart[0].adds, cart[0].removes, cart[0].net()), (2, 1, 1));

    let summary = Core::build_dashboard(&records, 5);
    assert_eq!(summary.overview.total_events, 13);
    assert_eq!(summary.overview.cart_actions, 3);
    assert_eq!(summary.overview.sessions, 1);
    assert_eq!(summary.events.len(), 13);
    assert!(summary.events.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
}

#[test]
fn clearing_is_scoped_to_the_current_session() {
    let store: Arc<dyn ActivityStore> = Arc::new(MemoryActivityStore::new());
    let clock = Arc::new(ManualClock::new(START));

    let mine = tracker_with(Arc::clone(&store), "session_1_mine000", clock.clone(), ThresholdPolicy::Each);
    let theirs = tracker_with(Arc::clone(&store), "session_1_theirs0", clock, ThresholdPolicy::Each);

    mine.track_element_click("#buy", Fields::new());
    mine.track_button_press("subscribe", Fields::new());
    theirs.track_link_visit("/sale", "Sale", Fields::new());

    assert_eq!(mine.clear_activities(), 2);
    assert!(mine.activities().is_empty());

    let left = store.list_all().unwrap();
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].session_id, "session_1_theirs0");
}

#[test]
fn unavailable_store_degrades_without_failing() {
    let store: Arc<dyn ActivityStore> = Arc::new(UnavailableStore::new("disk gone"));
    let clock = Arc::new(ManualClock::new(START));
    let tracker = tracker_with(store, "session_1_aaaaaaa", clock, ThresholdPolicy::Each);

    assert!(!tracker.is_loading());
    assert!(tracker.activities().is_empty());

    let record = tracker.track_event(EventType::Search, fields(json!({ "searchTerm": "lamp" })));
    assert_eq!(record.event_type(), EventType::Search);
    assert!(tracker.current_session_activities().is_empty());
    assert_eq!(tracker.clear_activities(), 0);
}

#[test]
fn sqlite_store_round_trips_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("activities.sqlite");
    let path = path.to_string_lossy().to_string();

    let clock = Arc::new(ManualClock::new(START));
    let written = {
        let store: Arc<dyn ActivityStore> = Arc::new(SqliteActivityStore::open(&path).unwrap());
        let tracker = tracker_with(store, "session_1_aaaaaaa", clock.clone(), ThresholdPolicy::Each);
        tracker.page().navigate("/checkout");
        let a = tracker.track_event(
            EventType::CheckoutStart,
            fields(json!({ "cartTotal": 79.8, "itemCount": 2, "coupon": "SPRING" })),
        );
        clock.advance_secs(2);
        let b = tracker.track_form("checkout", "submit".parse().unwrap(), None, Fields::new());
        vec![a, b]
    };

    let reopened = SqliteActivityStore::open(&path).unwrap();
    let loaded = reopened.list_all().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, written[1].id);
    assert_eq!(loaded[1].id, written[0].id);
    assert_eq!(loaded[1].page, "/checkout");
    assert_eq!(loaded[1].timestamp, START);
    assert_eq!(loaded[1].event_data.to_json()["coupon"], json!("SPRING"));
    assert_eq!(
        serde_json::to_value(&loaded[1]).unwrap(),
        serde_json::to_value(&written[0]).unwrap()
    );

    let by_type = reopened.list_by_type(EventType::FormInteraction).unwrap();
    assert_eq!(by_type.len(), 1);
    assert_eq!(by_type[0].event_data.to_json()["action"], json!("submit"));
}

#[test]
fn stored_event_data_matches_the_caller_input() {
    let clock = Arc::new(ManualClock::new(START));
    let store: Arc<dyn ActivityStore> = Arc::new(SqliteActivityStore::in_memory().unwrap());
    let tracker = tracker_with(store.clone(), "session_1_aaaaaaa", clock.clone(), ThresholdPolicy::Each);

    let inputs = [
        (EventType::FilterApply, json!({ "filterType": "category", "value": null })),
        (EventType::ProductView, json!({ "productName": "Lamp", "price": 10 })),
        (EventType::AddToCart, json!({ "productName": "Lamp", "price": 10, "quantity": 1.0 })),
    ];
    for (kind, data) in &inputs {
        tracker.track_event(*kind, fields(data.clone()));
        clock.advance_secs(1);
    }

    let mut stored = store.list_all().unwrap();
    stored.reverse();
    assert_eq!(stored.len(), inputs.len());
    for (record, (kind, data)) in stored.iter().zip(&inputs) {
        assert_eq!(record.event_type(), *kind);
        let mut out = record.event_data.to_fields();
        assert!(out.remove("deviceInfo").is_some());
        assert!(out.remove("locationInfo").is_some());
        assert_eq!(Value::Object(out), *data);
    }
}
