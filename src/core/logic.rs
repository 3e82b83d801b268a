use crate::core::aggregator::{
    cart_activity_by_product, chronological_table, overview, top_product_views, type_histogram,
};
use crate::models::activity::ActivityRecord;
use crate::models::dashboard::DashboardSummary;

pub struct Core;

impl Core {
    pub fn build_dashboard(records: &[ActivityRecord], top_n: usize) -> DashboardSummary {
        DashboardSummary {
            overview: overview(records),
            by_type: type_histogram(records),
            top_products: top_product_views(records, top_n),
            cart_activity: cart_activity_by_product(records, top_n),
            events: chronological_table(records),
        }
    }
}
