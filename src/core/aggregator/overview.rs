use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use serde::Serialize;
use std::collections::HashSet;

/// Headline counters of the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub total_events: usize,
    pub product_views: usize,
    pub cart_actions: usize,
    pub sessions: usize,
}

pub fn overview(records: &[ActivityRecord]) -> Overview {
    let sessions: HashSet<&str> = records.iter().map(|r| r.session_id.as_str()).collect();

    Overview {
        total_events: records.len(),
        product_views: records
            .iter()
            .filter(|r| r.event_type() == EventType::ProductView)
            .count(),
        cart_actions: records.iter().filter(|r| r.event_type().is_cart()).count(),
        sessions: sessions.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::test_support::rec;
    use serde_json::json;

    #[test]
    fn counts_views_and_cart_actions() {
        let records = [
            rec(EventType::ProductView, json!({})),
            rec(EventType::AddToCart, json!({})),
            rec(EventType::RemoveFromCart, json!({})),
            rec(EventType::Click, json!({})),
        ];
        let o = overview(&records);
        assert_eq!(o.total_events, 4);
        assert_eq!(o.product_views, 1);
        assert_eq!(o.cart_actions, 2);
        assert_eq!(o.sessions, 1);
    }
}
