//! Provider-neutral view of a courier API

use crate::entities::Order;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Translates between our orders and one courier's JSON schema.
///
/// Adapters never perform I/O: they build request bodies and paths, and read
/// fields out of response bodies. The [`CourierClient`](super::CourierClient)
/// does the HTTP work.
pub trait CourierAdapter: Send + Sync {
    /// Registry key, e.g. `"steadfast"`
    fn provider(&self) -> &'static str;

    /// Path of the consignment creation endpoint, relative to the base URL
    fn create_path(&self) -> &'static str {
        "create_order"
    }

    /// Request body for creating a consignment from `order`
    fn dispatch_payload(&self, order: &Order) -> Value;

    /// Tracking code from a successful creation response
    fn tracking_code(&self, response: &Value) -> Option<String>;

    /// Path of the status endpoint for a tracking code
    fn status_path(&self, tracking_code: &str) -> String;

    /// Delivery status string from a status response
    fn delivery_status(&self, response: &Value) -> Option<String>;

    /// Path of the live tracking timeline for a tracking code
    fn events_path(&self, tracking_code: &str) -> String;

    /// Timeline entries from a tracking response, in provider order
    fn events(&self, response: &Value) -> Option<Vec<TrackingEvent>>;
}

/// One entry of a courier's tracking timeline.
///
/// `raw` is the provider's event object untouched; the other fields are
/// lifted out of it for sorting and display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackingEvent {
    pub timestamp: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub message: Option<String>,
    pub raw: Value,
}

impl TrackingEvent {
    pub(crate) fn from_raw(raw: &Value, status_key: &str, message_key: &str, time_key: &str) -> Self {
        Self {
            timestamp: raw.get(time_key).and_then(parse_timestamp),
            status: raw.get(status_key).and_then(scalar_string),
            message: raw.get(message_key).and_then(scalar_string),
            raw: raw.clone(),
        }
    }
}

/// Newest first; undated entries sink to the end.
pub fn sort_newest_first(events: &mut [TrackingEvent]) {
    events.sort_by(|a, b| match (a.timestamp, b.timestamp) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Follow `path` through nested objects.
pub(crate) fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(key))
}

/// Strings as-is, numbers in their decimal form; anything else is absent.
pub(crate) fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn string_at(value: &Value, path: &[&str]) -> Option<String> {
    lookup(value, path).and_then(scalar_string)
}

pub(crate) fn events_at(
    value: &Value,
    path: &[&str],
    status_key: &str,
    message_key: &str,
    time_key: &str,
) -> Option<Vec<TrackingEvent>> {
    let list = lookup(value, path)?.as_array()?;
    Some(
        list.iter()
            .map(|raw| TrackingEvent::from_raw(raw, status_key, message_key, time_key))
            .collect(),
    )
}

/// Couriers report times as RFC 3339 or as a naive `YYYY-MM-DD HH:MM:SS`
/// in UTC.
pub(crate) fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    let raw = value.as_str()?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
}
