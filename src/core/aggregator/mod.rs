//! Pure transforms from a record list to dashboard data. No I/O; missing
//! or malformed fields fall back to defaults.

pub mod histogram;
pub mod overview;
pub mod products;
pub mod table;

pub use histogram::{TypeCount, type_histogram};
pub use overview::{Overview, overview};
pub use products::{CartActivity, ProductViews, cart_activity_by_product, top_product_views};
pub use table::{EventRow, chronological_table};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::models::activity::{ActivityRecord, EventData};
    use crate::models::event_type::EventType;
    use serde_json::Value;

    pub fn rec_at(id: &str, ts: i64, kind: EventType, data: Value) -> ActivityRecord {
        ActivityRecord {
            id: id.to_string(),
            user_id: None,
            event_data: EventData::from_json(kind, data),
            timestamp: ts,
            session_id: "session_1_aaaaaaa".to_string(),
            page: "/".to_string(),
        }
    }

    pub fn rec(kind: EventType, data: Value) -> ActivityRecord {
        rec_at("activity_1_aaaaaaa", 1, kind, data)
    }
}
