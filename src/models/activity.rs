use super::context::{ClientContext, DeviceInfo, LocationInfo};
use super::event_type::EventType;
use super::payload::{EventPayload, Fields};
use crate::utils::time::millis_to_iso;
use serde::de::DeserializeOwned;
use serde::{Serialize, Serializer};
use serde_json::Value;

pub const DEVICE_INFO_KEY: &str = "deviceInfo";
pub const LOCATION_INFO_KEY: &str = "locationInfo";

/// Payload of a record plus the client metadata merged into it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventData {
    pub payload: EventPayload,
    pub device_info: Option<DeviceInfo>,
    pub location_info: Option<LocationInfo>,
}

impl EventData {
    pub fn new(payload: EventPayload) -> Self {
        Self {
            payload,
            device_info: None,
            location_info: None,
        }
    }

    /// Build from the open map form. The metadata sub-keys are lifted out
    /// only when they decode losslessly; anything else stays as data.
    pub fn from_fields(kind: EventType, mut fields: Fields) -> Self {
        let device_info = take_sub_key(&mut fields, DEVICE_INFO_KEY);
        let location_info = take_sub_key(&mut fields, LOCATION_INFO_KEY);

        Self {
            payload: EventPayload::decode(kind, fields),
            device_info,
            location_info,
        }
    }

    /// Like [`EventData::from_fields`], for an arbitrary JSON value.
    /// Anything that is not an object decodes as an empty payload.
    pub fn from_json(kind: EventType, value: Value) -> Self {
        match value {
            Value::Object(map) => Self::from_fields(kind, map),
            Value::Null => Self::new(EventPayload::empty(kind)),
            other => {
                tracing::warn!(event_type = %kind, value = %other, "event data is not an object, using empty data");
                Self::new(EventPayload::empty(kind))
            }
        }
    }

    pub fn event_type(&self) -> EventType {
        self.payload.event_type()
    }

    /// Merge client metadata under the fixed sub-keys. Entries the caller
    /// already supplied are left as they are.
    pub fn enrich(&mut self, ctx: &ClientContext) {
        if self.device_info.is_none() && !self.payload.extra().contains_key(DEVICE_INFO_KEY) {
            self.device_info = Some(ctx.device.clone());
        }
        if self.location_info.is_none() && !self.payload.extra().contains_key(LOCATION_INFO_KEY)
        {
            self.location_info = Some(ctx.location.clone());
        }
    }

    pub fn to_fields(&self) -> Fields {
        let mut map = self.payload.to_fields();
        if let Some(device) = &self.device_info
            && let Ok(v) = serde_json::to_value(device)
        {
            map.insert(DEVICE_INFO_KEY.to_string(), v);
        }
        if let Some(location) = &self.location_info
            && let Ok(v) = serde_json::to_value(location)
        {
            map.insert(LOCATION_INFO_KEY.to_string(), v);
        }
        map
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.to_fields())
    }
}

fn take_sub_key<T: DeserializeOwned + Serialize>(fields: &mut Fields, key: &str) -> Option<T> {
    let raw = fields.remove(key)?;

    if let Ok(parsed) = serde_json::from_value::<T>(raw.clone())
        && serde_json::to_value(&parsed).ok().as_ref() == Some(&raw)
    {
        return Some(parsed);
    }

    fields.insert(key.to_string(), raw);
    None
}

/// One observation of a user or automatic interaction. Append-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRecord {
    pub id: String,              // ⇔ user_activities.id ("activity_<ms>_<base36>")
    pub user_id: Option<String>, // ⇔ user_activities.user_id (NULL for anonymous visitors)
    pub event_data: EventData,   // ⇔ user_activities.event_type + event_data (JSON)
    pub timestamp: i64,          // ⇔ user_activities.timestamp (ISO-8601 on disk, epoch ms here)
    pub session_id: String,      // ⇔ user_activities.session_id
    pub page: String,            // ⇔ user_activities.page
}

impl ActivityRecord {
    pub fn event_type(&self) -> EventType {
        self.event_data.event_type()
    }

    pub fn timestamp_iso(&self) -> String {
        millis_to_iso(self.timestamp)
    }

    pub fn product_name(&self) -> Option<&str> {
        self.event_data.payload.product_name()
    }

    /// Short description for tables: product name and/or quoted search term.
    pub fn details(&self) -> String {
        let mut parts = Vec::new();
        if let Some(name) = self.product_name() {
            parts.push(name.to_string());
        }
        if let Some(term) = self.event_data.payload.search_term()
            && !term.is_empty()
        {
            parts.push(format!("\"{term}\""));
        }
        parts.join(" ")
    }

    /// Page path, `/` when the record carries none.
    pub fn page_or_root(&self) -> &str {
        if self.page.is_empty() { "/" } else { &self.page }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ActivityJson<'a> {
    id: &'a str,
    user_id: Option<&'a str>,
    event_type: EventType,
    event_data: Value,
    timestamp: i64,
    session_id: &'a str,
    page: &'a str,
}

impl Serialize for ActivityRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ActivityJson {
            id: &self.id,
            user_id: self.user_id.as_deref(),
            event_type: self.event_type(),
            event_data: self.event_data.to_json(),
            timestamp: self.timestamp,
            session_id: &self.session_id,
            page: &self.page,
        }
        .serialize(serializer)
    }
}
