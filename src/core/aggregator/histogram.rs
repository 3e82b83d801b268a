use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub event_type: EventType,
    pub label: String,
    pub count: usize,
}

/// Count records per event type, most frequent first.
/// Ties keep the declaration order of [`EventType`].
pub fn type_histogram(records: &[ActivityRecord]) -> Vec<TypeCount> {
    let mut counts: BTreeMap<EventType, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.event_type()).or_default() += 1;
    }

    let mut out: Vec<TypeCount> = counts
        .into_iter()
        .map(|(event_type, count)| TypeCount {
            event_type,
            label: event_type.label(),
            count,
        })
        .collect();

    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}
