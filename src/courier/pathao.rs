//! Pathao Courier

use super::adapter::{CourierAdapter, TrackingEvent, events_at, string_at};
use crate::entities::Order;
use serde_json::{Value, json};

pub struct PathaoAdapter;

impl CourierAdapter for PathaoAdapter {
    fn provider(&self) -> &'static str {
        "pathao"
    }

    fn dispatch_payload(&self, order: &Order) -> Value {
        let quantity: u64 = order.items.iter().map(|item| u64::from(item.quantity)).sum();
        json!({
            "merchant_order_id": order.invoice,
            "recipient_name": order.customer_name,
            "recipient_phone": order.customer_phone,
            "recipient_address": order.customer_address,
            "amount_to_collect": order.total_amount,
            "special_instruction": order.note.clone().unwrap_or_default(),
            "item_quantity": quantity,
        })
    }

    fn tracking_code(&self, response: &Value) -> Option<String> {
        string_at(response, &["data", "consignment_id"])
    }

    fn status_path(&self, tracking_code: &str) -> String {
        format!("orders/{}/info", tracking_code)
    }

    fn delivery_status(&self, response: &Value) -> Option<String> {
        string_at(response, &["data", "order_status"])
    }

    fn events_path(&self, tracking_code: &str) -> String {
        format!("orders/{}/tracking", tracking_code)
    }

    fn events(&self, response: &Value) -> Option<Vec<TrackingEvent>> {
        events_at(response, &["data", "logs"], "order_status", "desc", "created_at")
    }
}
