use crate::core::aggregator::{CartActivity, EventRow, Overview, ProductViews, TypeCount};
use serde::Serialize;

/// Everything the dashboard shows, computed from one activity snapshot.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSummary {
    pub overview: Overview,
    pub by_type: Vec<TypeCount>,
    pub top_products: Vec<ProductViews>,
    pub cart_activity: Vec<CartActivity>,
    pub events: Vec<EventRow>,
}
