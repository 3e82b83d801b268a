//! Typed event payloads.
//!
//! Every event kind has a known shape. Fields the shape does not know about
//! are kept in its `extra` map, so callers can attach anything and it is
//! stored and exported unchanged.

use super::event_type::EventType;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Open key → value map, the storage form of `event_data`.
pub type Fields = Map<String, Value>;

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// Payload shared by `add_to_cart` and `remove_from_cart`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartChange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// Payload shared by `checkout_start` and `checkout_complete`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkout {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_items: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_total: Option<f64>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Search {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results_count: Option<i64>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterApply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Click {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hover {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub element: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollDepth {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_max_depth: Option<f64>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormAction {
    Submit,
    Input,
    Focus,
    Blur,
}

impl FormAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormAction::Submit => "submit",
            FormAction::Input => "input",
            FormAction::Focus => "focus",
            FormAction::Blur => "blur",
        }
    }
}

impl std::str::FromStr for FormAction {
    type Err = crate::errors::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "submit" => Ok(FormAction::Submit),
            "input" => Ok(FormAction::Input),
            "focus" => Ok(FormAction::Focus),
            "blur" => Ok(FormAction::Blur),
            _ => Err(crate::errors::AppError::InvalidFormAction(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInteraction {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action: Option<FormAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ButtonClick {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub button_name: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkClick {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link_text: Option<String>,
    #[serde(flatten)]
    pub extra: Fields,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSpent {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_time_on_page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_interval: Option<u64>,
    #[serde(flatten)]
    pub extra: Fields,
}

/// Object-safe view over a payload shape.
trait ShapeFields {
    fn extra(&self) -> &Fields;
    fn extra_mut(&mut self) -> &mut Fields;
    fn to_fields(&self) -> Fields;
}

trait Shape: ShapeFields + DeserializeOwned + Default {}

macro_rules! impl_shape {
    ($($ty:ty),* $(,)?) => {
        $(
            impl ShapeFields for $ty {
                fn extra(&self) -> &Fields {
                    &self.extra
                }

                fn extra_mut(&mut self) -> &mut Fields {
                    &mut self.extra
                }

                fn to_fields(&self) -> Fields {
                    match serde_json::to_value(self) {
                        Ok(Value::Object(map)) => map,
                        _ => self.extra.clone(),
                    }
                }
            }

            impl Shape for $ty {}
        )*
    };
}

impl_shape!(
    PageView,
    ProductView,
    CartChange,
    Checkout,
    Search,
    FilterApply,
    Click,
    Hover,
    ScrollDepth,
    FormInteraction,
    ButtonClick,
    LinkClick,
    TimeSpent,
);

/// Decode a shape without ever failing.
///
/// A key stays in its typed field only when it reads back exactly as given.
/// Anything else (`price: "cheap"`, `value: null`, an integer `price`) is
/// moved to `extra` untouched and the typed field stays `None`, so the
/// stored map always equals the caller's map.
fn decode_shape<T: Shape>(fields: Fields) -> T {
    if let Some(shape) = decode_exact::<T>(&fields) {
        return shape;
    }

    let mut good = Fields::new();
    let mut rejected = Fields::new();

    for (key, value) in fields {
        let mut single = Fields::new();
        single.insert(key.clone(), value.clone());
        if decode_exact::<T>(&single).is_some() {
            good.insert(key, value);
        } else {
            rejected.insert(key, value);
        }
    }

    tracing::debug!(
        rejected = ?rejected.keys().collect::<Vec<_>>(),
        "event data fields did not match their typed shape"
    );

    let mut shape: T = serde_json::from_value(Value::Object(good)).unwrap_or_default();
    shape.extra_mut().extend(rejected);
    shape
}

fn decode_exact<T: Shape>(fields: &Fields) -> Option<T> {
    let shape = serde_json::from_value::<T>(Value::Object(fields.clone())).ok()?;
    (shape.to_fields() == *fields).then_some(shape)
}

/// Event data, tagged by event kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EventPayload {
    PageView(PageView),
    ProductView(ProductView),
    AddToCart(CartChange),
    RemoveFromCart(CartChange),
    CheckoutStart(Checkout),
    CheckoutComplete(Checkout),
    Search(Search),
    FilterApply(FilterApply),
    Click(Click),
    Hover(Hover),
    Scroll(ScrollDepth),
    FormInteraction(FormInteraction),
    ButtonClick(ButtonClick),
    LinkClick(LinkClick),
    TimeSpent(TimeSpent),
}

impl EventPayload {
    /// Interpret an open map as the payload of `kind`. Never fails.
    pub fn decode(kind: EventType, fields: Fields) -> Self {
        match kind {
            EventType::PageView => Self::PageView(decode_shape(fields)),
            EventType::ProductView => Self::ProductView(decode_shape(fields)),
            EventType::AddToCart => Self::AddToCart(decode_shape(fields)),
            EventType::RemoveFromCart => Self::RemoveFromCart(decode_shape(fields)),
            EventType::CheckoutStart => Self::CheckoutStart(decode_shape(fields)),
            EventType::CheckoutComplete => Self::CheckoutComplete(decode_shape(fields)),
            EventType::Search => Self::Search(decode_shape(fields)),
            EventType::FilterApply => Self::FilterApply(decode_shape(fields)),
            EventType::Click => Self::Click(decode_shape(fields)),
            EventType::Hover => Self::Hover(decode_shape(fields)),
            EventType::Scroll => Self::Scroll(decode_shape(fields)),
            EventType::FormInteraction => Self::FormInteraction(decode_shape(fields)),
            EventType::ButtonClick => Self::ButtonClick(decode_shape(fields)),
            EventType::LinkClick => Self::LinkClick(decode_shape(fields)),
            EventType::TimeSpent => Self::TimeSpent(decode_shape(fields)),
        }
    }

    /// Empty payload for `kind`.
    pub fn empty(kind: EventType) -> Self {
        Self::decode(kind, Fields::new())
    }

    pub fn event_type(&self) -> EventType {
        match self {
            Self::PageView(_) => EventType::PageView,
            Self::ProductView(_) => EventType::ProductView,
            Self::AddToCart(_) => EventType::AddToCart,
            Self::RemoveFromCart(_) => EventType::RemoveFromCart,
            Self::CheckoutStart(_) => EventType::CheckoutStart,
            Self::CheckoutComplete(_) => EventType::CheckoutComplete,
            Self::Search(_) => EventType::Search,
            Self::FilterApply(_) => EventType::FilterApply,
            Self::Click(_) => EventType::Click,
            Self::Hover(_) => EventType::Hover,
            Self::Scroll(_) => EventType::Scroll,
            Self::FormInteraction(_) => EventType::FormInteraction,
            Self::ButtonClick(_) => EventType::ButtonClick,
            Self::LinkClick(_) => EventType::LinkClick,
            Self::TimeSpent(_) => EventType::TimeSpent,
        }
    }

    fn shape(&self) -> &dyn ShapeFields {
        match self {
            Self::PageView(p) => p,
            Self::ProductView(p) => p,
            Self::AddToCart(p) | Self::RemoveFromCart(p) => p,
            Self::CheckoutStart(p) | Self::CheckoutComplete(p) => p,
            Self::Search(p) => p,
            Self::FilterApply(p) => p,
            Self::Click(p) => p,
            Self::Hover(p) => p,
            Self::Scroll(p) => p,
            Self::FormInteraction(p) => p,
            Self::ButtonClick(p) => p,
            Self::LinkClick(p) => p,
            Self::TimeSpent(p) => p,
        }
    }

    fn shape_mut(&mut self) -> &mut dyn ShapeFields {
        match self {
            Self::PageView(p) => p,
            Self::ProductView(p) => p,
            Self::AddToCart(p) | Self::RemoveFromCart(p) => p,
            Self::CheckoutStart(p) | Self::CheckoutComplete(p) => p,
            Self::Search(p) => p,
            Self::FilterApply(p) => p,
            Self::Click(p) => p,
            Self::Hover(p) => p,
            Self::Scroll(p) => p,
            Self::FormInteraction(p) => p,
            Self::ButtonClick(p) => p,
            Self::LinkClick(p) => p,
            Self::TimeSpent(p) => p,
        }
    }

    /// Fields outside the typed shape.
    pub fn extra(&self) -> &Fields {
        self.shape().extra()
    }

    pub fn extra_mut(&mut self) -> &mut Fields {
        self.shape_mut().extra_mut()
    }

    /// Flatten back to the open map form (typed fields + extra).
    pub fn to_fields(&self) -> Fields {
        self.shape().to_fields()
    }

    /// `productName`, from the typed field when the kind has one, otherwise
    /// from a string in `extra`.
    pub fn product_name(&self) -> Option<&str> {
        let typed = match self {
            Self::ProductView(p) => p.product_name.as_deref(),
            Self::AddToCart(p) | Self::RemoveFromCart(p) => p.product_name.as_deref(),
            _ => None,
        };
        typed.or_else(|| self.extra().get("productName").and_then(Value::as_str))
    }

    pub fn search_term(&self) -> Option<&str> {
        let typed = match self {
            Self::Search(s) => s.search_term.as_deref(),
            _ => None,
        };
        typed.or_else(|| self.extra().get("searchTerm").and_then(Value::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn decode_keeps_unknown_keys_in_extra() {
        let payload = EventPayload::decode(
            EventType::ProductView,
            fields(json!({"productId": "3", "productName": "Wireless Headphones", "price": 249.99, "badge": "new"})),
        );

        match &payload {
            EventPayload::ProductView(p) => {
                assert_eq!(p.product_name.as_deref(), Some("Wireless Headphones"));
                assert_eq!(p.price, Some(249.99));
                assert_eq!(p.extra.get("badge"), Some(&json!("new")));
            }
            other => panic!("unexpected payload {other:?}"),
        }

        let back = payload.to_fields();
        assert_eq!(back.get("productId"), Some(&json!("3")));
        assert_eq!(back.get("badge"), Some(&json!("new")));
    }

    #[test]
    fn malformed_field_is_moved_to_extra_and_valid_ones_survive() {
        let payload = EventPayload::decode(
            EventType::AddToCart,
            fields(json!({"productName": "Smart Watch", "quantity": "two"})),
        );

        match &payload {
            EventPayload::AddToCart(c) => {
                assert_eq!(c.product_name.as_deref(), Some("Smart Watch"));
                assert_eq!(c.quantity, None);
                assert_eq!(c.extra.get("quantity"), Some(&json!("two")));
            }
            other => panic!("unexpected payload {other:?}"),
        }
        assert_eq!(payload.product_name(), Some("Smart Watch"));
    }

    #[test]
    fn product_name_falls_back_to_extra_for_other_kinds() {
        let payload =
            EventPayload::decode(EventType::Click, fields(json!({"productName": "Desk Lamp"})));
        assert_eq!(payload.product_name(), Some("Desk Lamp"));

        let payload = EventPayload::decode(EventType::ProductView, fields(json!({"productName": 7})));
        assert_eq!(payload.product_name(), None);
    }

    #[test]
    fn decode_always_matches_the_requested_kind() {
        for kind in EventType::ALL {
            assert_eq!(EventPayload::empty(kind).event_type(), kind);
        }
    }

    #[test]
    fn null_and_integer_values_read_back_unchanged() {
        let input = fields(json!({"filterType": "category", "value": null}));
        let payload = EventPayload::decode(EventType::FilterApply, input.clone());
        assert_eq!(payload.to_fields(), input);

        let input = fields(json!({"productName": "Lamp", "price": 10, "quantity": 2}));
        let payload = EventPayload::decode(EventType::AddToCart, input.clone());
        assert_eq!(payload.to_fields(), input);
        match &payload {
            EventPayload::AddToCart(c) => {
                assert_eq!(c.quantity, Some(2));
                assert_eq!(c.price, None);
                assert_eq!(c.extra.get("price"), Some(&json!(10)));
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn form_action_serializes_lowercase() {
        let payload = EventPayload::FormInteraction(FormInteraction {
            form_name: Some("newsletter".into()),
            action: Some(FormAction::Submit),
            field_name: None,
            extra: Fields::new(),
        });
        let out = payload.to_fields();
        assert_eq!(out.get("action"), Some(&json!("submit")));
        assert!(!out.contains_key("fieldName"));
    }
}
