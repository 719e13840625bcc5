//! Courier integration: dispatch orders and track their delivery
//!
//! Each courier provider is described by a [`CourierAdapter`] that knows the
//! provider's field names and JSON paths. The [`CourierRegistry`] selects an
//! adapter by name, the [`CourierClient`] performs the HTTP calls, and the
//! [`OrderStatusTracker`] ties them to stored orders.

pub mod adapter;
pub mod client;
pub mod locks;
pub mod pathao;
pub mod redx;
pub mod registry;
pub mod steadfast;
pub mod tracker;

pub use adapter::{CourierAdapter, TrackingEvent};
pub use client::CourierClient;
pub use locks::OrderLocks;
pub use pathao::PathaoAdapter;
pub use redx::RedxAdapter;
pub use registry::CourierRegistry;
pub use steadfast::SteadfastAdapter;
pub use tracker::{
    FreshStatus, OrderStatusTracker, StaleStatus, StaleTimeline, StatusReport, Timeline,
    TimelineReport,
};

/// Providers with a builtin adapter
pub const BUILTIN_PROVIDERS: &[&str] = &["steadfast", "pathao", "redx"];

#[cfg(test)]
pub(crate) mod test_support {
    use crate::entities::{CreateOrder, CreateOrderItem, Order};
    use uuid::Uuid;

    pub fn sample_order() -> Order {
        Order::from_create(CreateOrder {
            customer_name: "Rahim Uddin".into(),
            customer_phone: "01712345678".into(),
            customer_address: "House 4, Road 7, Dhanmondi, Dhaka".into(),
            items: vec![
                CreateOrderItem {
                    product_id: Uuid::new_v4(),
                    name: "Canvas Tote".into(),
                    quantity: 2,
                    unit_price: 450.0,
                },
                CreateOrderItem {
                    product_id: Uuid::new_v4(),
                    name: "Cap".into(),
                    quantity: 1,
                    unit_price: 300.0,
                },
            ],
            note: Some("Call before delivery".into()),
        })
    }
}
