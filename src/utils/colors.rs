/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const CYAN: &str = "\x1b[36m";
pub const MAGENTA: &str = "\x1b[35m";

/// Net cart color:
/// \>0 → green
/// \<0 → red
/// 0 → reset
pub fn color_for_net(value: i64) -> &'static str {
    if value > 0 {
        GREEN
    } else if value < 0 {
        RED
    } else {
        RESET
    }
}

/// Colour family of an event kind in tables.
pub fn color_for_event_type(kind: crate::models::event_type::EventType) -> &'static str {
    use crate::models::event_type::EventType::*;
    match kind {
        PageView | ProductView => BLUE,
        AddToCart | CheckoutStart | CheckoutComplete => GREEN,
        RemoveFromCart => RED,
        Search | FilterApply => MAGENTA,
        Scroll | TimeSpent => GREY,
        Click | Hover | FormInteraction | ButtonClick | LinkClick => CYAN,
    }
}

/// Grey out placeholder values.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

pub fn paint(color: &str, value: &str) -> String {
    format!("{color}{value}{RESET}")
}
