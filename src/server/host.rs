//! Server host holding the application state shared by every handler
//!
//! The host is built once by the [`ServerBuilder`](super::ServerBuilder) and
//! handed to the REST exposure, which derives its routers from it.

use crate::config::StoreConfig;
use crate::core::DataService;
use crate::courier::OrderStatusTracker;
use crate::entities::Order;
use crate::server::entity_registry::EntityRegistry;
use std::sync::Arc;

pub struct ServerHost {
    /// Effective configuration after overrides
    pub config: Arc<StoreConfig>,

    /// Catalog collections and their route builders
    pub entity_registry: EntityRegistry,

    /// Purchase order storage
    pub orders: Arc<dyn DataService<Order>>,

    /// Courier dispatch and delivery tracking
    pub tracker: Arc<OrderStatusTracker>,
}

impl ServerHost {
    pub fn new(
        config: StoreConfig,
        entity_registry: EntityRegistry,
        orders: Arc<dyn DataService<Order>>,
        tracker: OrderStatusTracker,
    ) -> Self {
        Self {
            config: Arc::new(config),
            entity_registry,
            orders,
            tracker: Arc::new(tracker),
        }
    }

    /// Get entity types registered in the host
    pub fn entity_types(&self) -> Vec<&str> {
        self.entity_registry.entity_types()
    }
}
