use crate::models::activity::ActivityRecord;
use crate::models::event_type::EventType;
use crate::models::payload::UNKNOWN_PRODUCT;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductViews {
    pub product_name: String,
    pub views: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartActivity {
    pub product_name: String,
    pub adds: usize,
    pub removes: usize,
}

impl CartActivity {
    pub fn net(&self) -> i64 {
        self.adds as i64 - self.removes as i64
    }
}

fn product_key(r: &ActivityRecord) -> String {
    r.product_name()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or(UNKNOWN_PRODUCT)
        .to_string()
}

/// Groups in first-seen order so that equal counts keep input order.
fn group<'a, T>(
    records: impl Iterator<Item = &'a ActivityRecord>,
    mut init: impl FnMut(String) -> T,
    mut update: impl FnMut(&mut T, &ActivityRecord),
) -> Vec<T> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<T> = Vec::new();

    for r in records {
        let key = product_key(r);
        let slot = match index.get(&key) {
            Some(i) => *i,
            None => {
                index.insert(key.clone(), out.len());
                out.push(init(key));
                out.len() - 1
            }
        };
        update(&mut out[slot], r);
    }
    out
}

/// Most viewed products, descending, at most `n`.
pub fn top_product_views(records: &[ActivityRecord], n: usize) -> Vec<ProductViews> {
    let mut views = group(
        records
            .iter()
            .filter(|r| r.event_type() == EventType::ProductView),
        |product_name| ProductViews {
            product_name,
            views: 0,
        },
        |p, _| p.views += 1,
    );

    views.sort_by(|a, b| b.views.cmp(&a.views));
    views.truncate(n);
    views
}

/// Adds and removes per product, by `adds - removes` descending, at most `n`.
pub fn cart_activity_by_product(records: &[ActivityRecord], n: usize) -> Vec<CartActivity> {
    let mut cart = group(
        records.iter().filter(|r| r.event_type().is_cart()),
        |product_name| CartActivity {
            product_name,
            adds: 0,
            removes: 0,
        },
        |c, r| match r.event_type() {
            EventType::AddToCart => c.adds += 1,
            _ => c.removes += 1,
        },
    );

    cart.sort_by_key(|c| std::cmp::Reverse(c.net()));
    cart.truncate(n);
    cart
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregator::test_support::rec;
    use serde_json::json;

    fn views_of(name: &str, n: usize) -> Vec<ActivityRecord> {
        (0..n)
            .map(|_| rec(EventType::ProductView, json!({ "productName": name })))
            .collect()
    }

    #[test]
    fn top_five_drops_the_sixth() {
        let mut records = Vec::new();
        for (name, n) in [("A", 10), ("B", 9), ("C", 8), ("D", 7), ("E", 6), ("F", 5)] {
            records.extend(views_of(name, n));
        }
        let top = top_product_views(&records, 5);
        let names: Vec<&str> = top.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, ["A", "B", "C", "D", "E"]);
        assert_eq!(top[0].views, 10);
        assert_eq!(top[4].views, 6);
    }

    #[test]
    fn missing_or_malformed_names_become_unknown() {
        let records = [
            rec(EventType::ProductView, json!({})),
            rec(EventType::ProductView, json!({ "productName": 42 })),
            rec(EventType::ProductView, json!({ "productName": "" })),
            rec(EventType::Click, json!({ "productName": "Ignored" })),
        ];
        let top = top_product_views(&records, 5);
        assert_eq!(
            top,
            vec![ProductViews {
                product_name: UNKNOWN_PRODUCT.to_string(),
                views: 3
            }]
        );
    }

    #[test]
    fn cart_activity_sorts_by_net_adds() {
        let records = [
            rec(EventType::AddToCart, json!({ "productName": "Lamp" })),
            rec(EventType::RemoveFromCart, json!({ "productName": "Lamp" })),
            rec(EventType::AddToCart, json!({ "productName": "Chair" })),
            rec(EventType::AddToCart, json!({ "productName": "Chair" })),
            rec(EventType::RemoveFromCart, json!({ "productName": "Watch" })),
        ];
        let cart = cart_activity_by_product(&records, 5);
        let rows: Vec<(&str, usize, usize)> = cart
            .iter()
            .map(|c| (c.product_name.as_str(), c.adds, c.removes))
            .collect();
        assert_eq!(rows, [("Chair", 2, 0), ("Lamp", 1, 1), ("Watch", 0, 1)]);
        assert_eq!(cart[2].net(), -1);
    }

    #[test]
    fn equal_counts_keep_first_seen_order() {
        let mut records = views_of("Second", 2);
        records.splice(0..0, views_of("First", 2));
        let top = top_product_views(&records, 5);
        assert_eq!(top[0].product_name, "First");
        assert_eq!(top[1].product_name, "Second");
    }
}
