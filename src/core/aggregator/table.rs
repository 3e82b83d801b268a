use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use serde::Serialize;

/// One line of the chronological events table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub id: String,
    pub timestamp: i64,
    pub event_type: EventType,
    pub page: String,
    pub details: String,
    pub session_id: String,
}

/// Oldest first, whatever order the input is in.
///
/// The store lists newest first with later insertions ahead on equal
/// timestamps; reversing before the stable sort keeps equal timestamps in
/// insertion order.
pub fn chronological_table(records: &[ActivityRecord]) -> Vec<EventRow> {
    let mut ordered: Vec<&ActivityRecord> = records.iter().rev().collect();
    ordered.sort_by_key(|r| r.timestamp);

    ordered
        .into_iter()
        .map(|r| EventRow {
            id: r.id.clone(),
            timestamp: r.timestamp,
            event_type: r.event_type(),
            page: r.page_or_root().to_string(),
            details: r.details(),
            session_id: r.session_id.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::test_support::rec_at;
    use serde_json::json;

    #[test]
    fn rows_are_ascending_even_from_unordered_input() {
        let records = [
            rec_at("b", 2_000, EventType::Click, json!({})),
            rec_at("c", 3_000, EventType::Search, json!({"searchTerm": "desk"})),
            rec_at("a", 1_000, EventType::ProductView, json!({"productName": "Desk Lamp"})),
        ];
        let rows = chronological_table(&records);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(rows[0].details, "Desk Lamp");
        assert_eq!(rows[2].details, "\"desk\"");
    }

    #[test]
    fn equal_timestamps_keep_insertion_order() {
        // newest-first store order: "second" was inserted after "first"
        let records = [
            rec_at("second", 1_000, EventType::Click, json!({})),
            rec_at("first", 1_000, EventType::Click, json!({})),
        ];
        let ids: Vec<String> = chronological_table(&records).into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn empty_page_shows_root() {
        let mut r = rec_at("a", 1, EventType::Click, json!({}));
        r.page.clear();
        assert_eq!(chronological_table(&[r])[0].page, "/");
    }
}
