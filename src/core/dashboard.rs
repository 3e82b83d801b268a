//! Terminal rendering of the dashboard views.

use crate::core::aggregator::EventRow;
use crate::models::dashboard::DashboardSummary;
use crate::ui::messages::{header, info};
use crate::utils::colors::{CYAN, GREEN, RESET, color_for_event_type, color_for_net, colorize_optional, paint};
use crate::utils::formatting::{bar, bold, pad_left, percent};
use crate::utils::table::{Table, pad};
use crate::utils::time::format_local;

const BAR_WIDTH: usize = 30;

pub struct DashboardLogic;

impl DashboardLogic {
    pub fn print(summary: &DashboardSummary) {
        let o = &summary.overview;

        header("Activity dashboard");
        println!(
            "{CYAN}Total events:{RESET} {}   {CYAN}Product views:{RESET} {}   {CYAN}Cart actions:{RESET} {}   {CYAN}Sessions:{RESET} {}",
            bold(&o.total_events.to_string()),
            bold(&o.product_views.to_string()),
            bold(&o.cart_actions.to_string()),
            bold(&o.sessions.to_string()),
        );
        println!();

        if o.total_events == 0 {
            info("No activities tracked yet.");
            return;
        }

        //
        // 1) EVENTS BY TYPE
        //
        header("Events by type");
        let max = summary.by_type.first().map(|t| t.count).unwrap_or(0);
        let label_w = summary.by_type.iter().map(|t| t.label.len()).max().unwrap_or(0);
        for t in &summary.by_type {
            println!(
                "{} {} {} {}",
                pad(&t.label, label_w),
                pad_left(&t.count.to_string(), 5),
                pad_left(&percent(t.count, o.total_events), 6),
                paint(color_for_event_type(t.event_type), &bar(t.count, max, BAR_WIDTH)),
            );
        }
        println!();

        //
        // 2) TOP PRODUCTS
        //
        header("Top viewed products");
        if summary.top_products.is_empty() {
            println!("{}", colorize_optional("--"));
        } else {
            let max = summary.top_products[0].views;
            let name_w = summary.top_products.iter().map(|p| p.product_name.len()).max().unwrap_or(0);
            for p in &summary.top_products {
                println!(
                    "{} {} {}",
                    pad(&p.product_name, name_w),
                    pad_left(&p.views.to_string(), 5),
                    paint(GREEN, &bar(p.views, max, BAR_WIDTH)),
                );
            }
        }
        println!();

        //
        // 3) CART ACTIVITY
        //
        header("Cart activity by product");
        if summary.cart_activity.is_empty() {
            println!("{}", colorize_optional("--"));
        } else {
            let mut t = Table::with_headers(&["Product", "Adds", "Removes", "Net"]);
            for c in &summary.cart_activity {
                let net = c.net();
                t.add_row(vec![
                    c.product_name.clone(),
                    c.adds.to_string(),
                    c.removes.to_string(),
                    format!("{net:+}"),
                ]);
            }
            // colour only the net column, after widths are known
            let rendered = t.render();
            for (i, line) in rendered.lines().enumerate() {
                match i.checked_sub(2).and_then(|r| summary.cart_activity.get(r)) {
                    Some(c) => println!("{}{}{}", color_for_net(c.net()), line, RESET),
                    None => println!("{line}"),
                }
            }
        }
        println!();

        //
        // 4) EVENTS
        //
        header("All events");
        print_events(&summary.events);
    }
}

/// Chronological events table: time, type, page, details.
pub fn print_events(rows: &[EventRow]) {
    if rows.is_empty() {
        info("No activities found.");
        return;
    }

    let mut t = Table::with_headers(&["Time", "Event", "Page", "Details"]);
    for r in rows {
        t.add_row(vec![
            format_local(r.timestamp),
            r.event_type.to_string(),
            r.page.clone(),
            r.details.clone(),
        ]);
    }
    print!("{}", t.render());
    println!("{} event(s)", rows.len());
}
