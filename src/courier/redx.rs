//! RedX

use super::adapter::{CourierAdapter, TrackingEvent, events_at, string_at};
use crate::entities::Order;
use serde_json::{Value, json};

pub struct RedxAdapter;

impl CourierAdapter for RedxAdapter {
    fn provider(&self) -> &'static str {
        "redx"
    }

    fn dispatch_payload(&self, order: &Order) -> Value {
        json!({
            "merchant_invoice_id": order.invoice,
            "customer_name": order.customer_name,
            "customer_phone": order.customer_phone,
            "customer_address": order.customer_address,
            "cash_collection_amount": order.total_amount,
            "instruction": order.note.clone().unwrap_or_default(),
            "value": order.total_amount,
        })
    }

    fn tracking_code(&self, response: &Value) -> Option<String> {
        string_at(response, &["tracking_id"])
    }

    fn status_path(&self, tracking_code: &str) -> String {
        format!("parcel/info/{}", tracking_code)
    }

    fn delivery_status(&self, response: &Value) -> Option<String> {
        string_at(response, &["parcel", "status"])
    }

    fn events_path(&self, tracking_code: &str) -> String {
        format!("parcel/track/{}", tracking_code)
    }

    fn events(&self, response: &Value) -> Option<Vec<TrackingEvent>> {
        events_at(response, &["tracking"], "status", "message_en", "time")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::courier::test_support::sample_order;

    #[test]
    fn test_payload_field_names() {
        let order = sample_order();
        let payload = RedxAdapter.dispatch_payload(&order);

        assert_eq!(payload["merchant_invoice_id"], order.invoice);
        assert_eq!(payload["customer_name"], "Rahim Uddin");
        assert_eq!(payload["cash_collection_amount"], 1200.0);
        assert_eq!(payload["instruction"], "Call before delivery");
    }

    #[test]
    fn test_response_paths() {
        assert_eq!(
            RedxAdapter.tracking_code(&json!({"tracking_id": "21A427TU4BN3R"})),
            Some("21A427TU4BN3R".into())
        );
        assert_eq!(
            RedxAdapter.delivery_status(&json!({"parcel": {"status": "delivered"}})),
            Some("delivered".into())
        );
        assert_eq!(RedxAdapter.delivery_status(&json!({"parcel": {}})), None);
        assert_eq!(RedxAdapter.status_path("X1"), "parcel/info/X1");
    }
}
