use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a tracked interaction.
///
/// The snake_case strings are the storage values and must never change:
/// records written by older builds have to decode unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    PageView,
    ProductView,
    AddToCart,
    RemoveFromCart,
    CheckoutStart,
    CheckoutComplete,
    Search,
    FilterApply,
    Click,
    Hover,
    Scroll,
    FormInteraction,
    ButtonClick,
    LinkClick,
    TimeSpent,
}

impl EventType {
    pub const ALL: [EventType; 15] = [
        EventType::PageView,
        EventType::ProductView,
        EventType::AddToCart,
        EventType::RemoveFromCart,
        EventType::CheckoutStart,
        EventType::CheckoutComplete,
        EventType::Search,
        EventType::FilterApply,
        EventType::Click,
        EventType::Hover,
        EventType::Scroll,
        EventType::FormInteraction,
        EventType::ButtonClick,
        EventType::LinkClick,
        EventType::TimeSpent,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EventType::PageView => "page_view",
            EventType::ProductView => "product_view",
            EventType::AddToCart => "add_to_cart",
            EventType::RemoveFromCart => "remove_from_cart",
            EventType::CheckoutStart => "checkout_start",
            EventType::CheckoutComplete => "checkout_complete",
            EventType::Search => "search",
            EventType::FilterApply => "filter_apply",
            EventType::Click => "click",
            EventType::Hover => "hover",
            EventType::Scroll => "scroll",
            EventType::FormInteraction => "form_interaction",
            EventType::ButtonClick => "button_click",
            EventType::LinkClick => "link_click",
            EventType::TimeSpent => "time_spent",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.to_db_str() == s)
    }

    /// Human-readable label used by the dashboard ("add_to_cart" → "add to cart").
    pub fn label(&self) -> String {
        self.to_db_str().replace('_', " ").to_lowercase()
    }

    pub fn is_cart(&self) -> bool {
        matches!(self, EventType::AddToCart | EventType::RemoveFromCart)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_str())
    }
}

impl FromStr for EventType {
    type Err = AppError;

    /// Accepts the storage value, case-insensitively, with `-` allowed for `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::from_db_str(&normalized).ok_or_else(|| AppError::InvalidEventType(s.to_string()))
    }
}
