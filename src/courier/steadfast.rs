//! Steadfast Courier

use super::adapter::{CourierAdapter, TrackingEvent, events_at, scalar_string, string_at};
use crate::entities::Order;
use serde_json::{Value, json};

pub struct SteadfastAdapter;

impl CourierAdapter for SteadfastAdapter {
    fn provider(&self) -> &'static str {
        "steadfast"
    }

    fn dispatch_payload(&self, order: &Order) -> Value {
        json!({
            "invoice": order.invoice,
            "recipient_name": order.customer_name,
            "recipient_phone": order.customer_phone,
            "recipient_address": order.customer_address,
            "cod_amount": order.total_amount,
            "note": order.note.clone().unwrap_or_default(),
        })
    }

    fn tracking_code(&self, response: &Value) -> Option<String> {
        string_at(response, &["consignment", "tracking_code"])
    }

    fn status_path(&self, tracking_code: &str) -> String {
        format!("status_by_trackingcode/{}", tracking_code)
    }

    /// Only a body with `status: 200` carries a usable delivery status
    fn delivery_status(&self, response: &Value) -> Option<String> {
        let ok = response
            .get("status")
            .and_then(scalar_string)
            .is_some_and(|code| code == "200");
        if !ok {
            return None;
        }
        string_at(response, &["delivery_status"])
    }

    fn events_path(&self, tracking_code: &str) -> String {
        format!("tracking/{}", tracking_code)
    }

    fn events(&self, response: &Value) -> Option<Vec<TrackingEvent>> {
        events_at(response, &["events"], "status", "message", "created_at")
    }
}
