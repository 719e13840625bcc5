//! Purchase orders and their delivery lifecycle

use crate::core::entity::{Data, Entity};
use crate::core::field::{FieldValue, ToFieldValue, phone_regex};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Fulfilment status of a purchase order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    ReadyToDelivery,
    SendToCourier,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::ReadyToDelivery => "ready_to_delivery",
            OrderStatus::SendToCourier => "send_to_courier",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders accept no further changes
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Forward moves along the fulfilment flow, or a cancel from any open state
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;

        if self.is_terminal() {
            return false;
        }
        matches!(
            (self, next),
            (Pending, ReadyToDelivery)
                | (Pending, SendToCourier)
                | (ReadyToDelivery, SendToCourier)
                | (SendToCourier, Delivered)
                | (_, Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "ready_to_delivery" => Ok(OrderStatus::ReadyToDelivery),
            "send_to_courier" => Ok(OrderStatus::SendToCourier),
            "delivered" => Ok(OrderStatus::Delivered),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status '{}'", other)),
        }
    }
}

/// A line on the order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: Uuid,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// What the courier last told us about this order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourierInfo {
    pub provider: String,
    /// Raw provider status string, e.g. `in_review` or `delivered`
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_status_sync_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub invoice: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_address: String,
    pub items: Vec<OrderItem>,
    /// Cash to collect on delivery
    pub total_amount: f64,
    #[serde(default)]
    pub note: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_id: Option<String>,
    #[serde(default)]
    pub courier: Option<CourierInfo>,
}

impl Order {
    /// Build a pending order from a validated payload.
    ///
    /// The invoice number is derived from the creation time and the id so it
    /// stays unique without a counter.
    pub fn from_create(input: CreateOrder) -> Self {
        let now = Utc::now();
        let id = Uuid::new_v4();
        let items: Vec<OrderItem> = input
            .items
            .into_iter()
            .map(|item| OrderItem {
                product_id: item.product_id,
                name: item.name,
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();
        let total_amount = items.iter().map(OrderItem::line_total).sum();
        let simple = id.simple().to_string();

        Self {
            id,
            entity_type: "order".to_string(),
            created_at: now,
            updated_at: now,
            invoice: format!("INV-{}-{}", now.format("%Y%m%d"), &simple[..8].to_uppercase()),
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            customer_address: input.customer_address,
            items,
            total_amount,
            note: input.note,
            status: OrderStatus::Pending,
            tracking_id: None,
            courier: None,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Record a successful courier hand-off
    pub fn mark_dispatched(&mut self, provider: &str, tracking_id: String) {
        self.tracking_id = Some(tracking_id);
        self.courier = Some(CourierInfo {
            provider: provider.to_string(),
            status: None,
            last_status_sync_at: None,
        });
        self.status = OrderStatus::SendToCourier;
        self.touch();
    }

    /// Record a fresh courier status read from `provider`
    pub fn record_courier_status(&mut self, provider: &str, status: String, at: DateTime<Utc>) {
        let courier = self.courier.get_or_insert_with(|| CourierInfo {
            provider: provider.to_string(),
            status: None,
            last_status_sync_at: None,
        });
        courier.status = Some(status);
        courier.last_status_sync_at = Some(at);
        self.touch();
    }
}

impl Entity for Order {
    fn resource_name() -> &'static str {
        "orders"
    }

    fn resource_name_singular() -> &'static str {
        "order"
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn entity_type(&self) -> &str {
        &self.entity_type
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl Data for Order {
    fn name(&self) -> &str {
        &self.invoice
    }

    fn indexed_fields() -> &'static [&'static str] {
        &["invoice", "tracking_id", "status", "customer_phone"]
    }

    fn field_value(&self, field: &str) -> Option<FieldValue> {
        match field {
            "name" | "invoice" => Some(self.invoice.to_field_value()),
            "tracking_id" => Some(self.tracking_id.to_field_value()),
            "status" => Some(FieldValue::String(self.status.as_str().to_string())),
            "customer_name" => Some(self.customer_name.to_field_value()),
            "customer_phone" => Some(self.customer_phone.to_field_value()),
            "total_amount" => Some(self.total_amount.to_field_value()),
            _ => None,
        }
    }
}

/// Body of `POST /orders`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateOrder {
    #[validate(length(min = 1, max = 120))]
    pub customer_name: String,
    #[validate(custom(function = "validate_phone"))]
    pub customer_phone: String,
    #[validate(length(min = 5, max = 500))]
    pub customer_address: String,
    #[validate(length(min = 1), nested)]
    pub items: Vec<CreateOrderItem>,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderItem {
    pub product_id: Uuid,
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(range(min = 1, max = 10000))]
    pub quantity: u32,
    #[validate(range(min = 0.0))]
    pub unit_price: f64,
}

/// Body of `PATCH /orders/{id}/status`
#[derive(Debug, Clone, Deserialize)]
pub struct StatusChange {
    pub status: OrderStatus,
}

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone");
        err.message = Some("must be an 11 digit mobile number starting with 01".into());
        Err(err)
    }
}
