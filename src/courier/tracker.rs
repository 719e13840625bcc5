//! Courier dispatch and delivery-status tracking for orders

use super::adapter::{CourierAdapter, TrackingEvent, sort_newest_first};
use super::client::CourierClient;
use super::locks::OrderLocks;
use super::registry::CourierRegistry;
use crate::config::{CourierEndpoint, StoreConfig};
use crate::core::{CourierError, DataService, EntityError, OrderError, ShopResult};
use crate::entities::Order;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;
use tracing::{info, warn};
use uuid::Uuid;

/// Status read straight from the courier and persisted on the order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FreshStatus {
    pub order_id: Uuid,
    pub tracking_id: String,
    pub provider: String,
    pub status: String,
    pub synced_at: DateTime<Utc>,
}

/// Last persisted status, returned when the courier could not be read.
///
/// `status` is `None` when the order has never been synced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleStatus {
    pub order_id: Uuid,
    pub tracking_id: String,
    pub provider: Option<String>,
    pub status: Option<String>,
    pub last_status_sync_at: Option<DateTime<Utc>>,
    pub reason: String,
}

/// Live tracking timeline, newest event first
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Timeline {
    pub tracking_id: String,
    pub provider: String,
    pub events: Vec<TrackingEvent>,
}

/// Empty timeline returned when the courier could not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaleTimeline {
    pub tracking_id: String,
    pub events: Vec<TrackingEvent>,
    pub reason: String,
}

/// Wire form of a status read, tagged with where it came from
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source")]
pub enum StatusReport {
    #[serde(rename = "live")]
    Live(FreshStatus),
    #[serde(rename = "fallback")]
    Fallback(StaleStatus),
}

impl From<Result<FreshStatus, StaleStatus>> for StatusReport {
    fn from(read: Result<FreshStatus, StaleStatus>) -> Self {
        match read {
            Ok(fresh) => StatusReport::Live(fresh),
            Err(stale) => StatusReport::Fallback(stale),
        }
    }
}

/// Wire form of a timeline read
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "source")]
pub enum TimelineReport {
    #[serde(rename = "live")]
    Live(Timeline),
    #[serde(rename = "fallback")]
    Fallback(StaleTimeline),
}

impl From<Result<Timeline, StaleTimeline>> for TimelineReport {
    fn from(read: Result<Timeline, StaleTimeline>) -> Self {
        match read {
            Ok(timeline) => TimelineReport::Live(timeline),
            Err(stale) => TimelineReport::Fallback(stale),
        }
    }
}

/// Hands orders to couriers and reads their delivery state back.
///
/// Dispatch failures are errors: the order is untouched and the caller
/// decides what to do. Status and timeline reads favour availability and
/// degrade to the last persisted value instead of failing.
///
/// Writes to one order are serialized through [`OrderLocks`]; anything else
/// that rewrites a stored order must hold [`lock_order`](Self::lock_order).
pub struct OrderStatusTracker {
    orders: Arc<dyn DataService<Order>>,
    locks: OrderLocks,
    registry: CourierRegistry,
    client: CourierClient,
    endpoints: HashMap<String, CourierEndpoint>,
    default_provider: Option<String>,
}

impl OrderStatusTracker {
    pub fn new(
        orders: Arc<dyn DataService<Order>>,
        registry: CourierRegistry,
        client: CourierClient,
        endpoints: Vec<CourierEndpoint>,
        default_provider: Option<String>,
    ) -> Self {
        Self {
            orders,
            locks: OrderLocks::new(),
            registry,
            client,
            endpoints: endpoints
                .into_iter()
                .map(|e| (e.provider.clone(), e))
                .collect(),
            default_provider,
        }
    }

    /// Tracker with the builtin adapters and the configured courier accounts
    pub fn from_config(orders: Arc<dyn DataService<Order>>, config: &StoreConfig) -> ShopResult<Self> {
        Ok(Self::new(
            orders,
            CourierRegistry::with_builtin(),
            CourierClient::new(config.courier_timeout())?,
            config.couriers.clone(),
            config.default_courier.clone(),
        ))
    }

    pub fn registry(&self) -> &CourierRegistry {
        &self.registry
    }

    /// Exclusive write access to one stored order
    pub async fn lock_order(&self, order_id: &Uuid) -> OwnedMutexGuard<()> {
        self.locks.acquire(order_id).await
    }

    /// Create a consignment for `order_id` with `provider` (or the default).
    ///
    /// On success the order gets its tracking id, the provider name and the
    /// `send_to_courier` status. On any failure it is left exactly as it was.
    /// The order stays locked from the dispatched check until the write, so
    /// one order never gets two consignments.
    pub async fn dispatch_to_courier(&self, order_id: &Uuid, provider: Option<&str>) -> ShopResult<Order> {
        let _guard = self.lock_order(order_id).await;
        let mut order = self.orders.get(order_id).await?.ok_or(EntityError::NotFound {
            entity_type: "order".to_string(),
            id: *order_id,
        })?;

        if let Some(tracking_id) = &order.tracking_id {
            return Err(OrderError::AlreadyDispatched {
                tracking_id: tracking_id.clone(),
            }
            .into());
        }
        if order.status.is_terminal() {
            return Err(OrderError::Terminal {
                status: order.status.to_string(),
            }
            .into());
        }
        check_dispatchable(&order)?;

        let provider = provider
            .map(str::to_string)
            .or_else(|| self.default_provider.clone())
            .ok_or_else(|| CourierError::NotConfigured {
                provider: "default".to_string(),
            })?;
        let (adapter, endpoint) = self.resolve(&provider)?;

        let payload = adapter.dispatch_payload(&order);
        let response = self
            .client
            .post_json(endpoint, adapter.create_path(), &payload)
            .await
            .inspect_err(|e| warn!(order_id = %order.id, provider = %provider, error = %e, "courier dispatch failed"))?;

        let tracking_code = adapter.tracking_code(&response).ok_or_else(|| {
            warn!(order_id = %order.id, provider = %provider, "dispatch response has no tracking code");
            CourierError::MissingTrackingCode {
                provider: provider.clone(),
            }
        })?;

        order.mark_dispatched(&provider, tracking_code.clone());
        let order = self.orders.update(order_id, order).await?;

        info!(
            order_id = %order.id,
            provider = %provider,
            tracking_id = %tracking_code,
            "order dispatched to courier"
        );
        Ok(order)
    }

    /// Read the courier's current status for `tracking_id`.
    ///
    /// `Ok(Ok(_))` is a live read that has been persisted. `Ok(Err(_))` is
    /// the last persisted value because the courier could not be read; the
    /// stored status is never overwritten in that case. Only an unknown
    /// tracking id or a storage failure is an `Err`.
    ///
    /// The courier is read without holding the order lock. The write re-reads
    /// the order under the lock and touches only its courier fields.
    pub async fn refresh_status(&self, tracking_id: &str) -> ShopResult<Result<FreshStatus, StaleStatus>> {
        let order = self.find_by_tracking_id(tracking_id).await?;
        let provider = self.provider_of(&order);

        let read = match provider.as_deref() {
            Some(provider) => self
                .fetch_status(provider, tracking_id)
                .await
                .map(|status| (provider.to_string(), status)),
            None => Err(CourierError::NotConfigured {
                provider: "default".to_string(),
            }),
        };

        match read {
            Ok((provider, status)) => {
                let synced_at = Utc::now();
                let _guard = self.lock_order(&order.id).await;
                let mut current = self.orders.get(&order.id).await?.ok_or(EntityError::NotFound {
                    entity_type: "order".to_string(),
                    id: order.id,
                })?;
                current.record_courier_status(&provider, status.clone(), synced_at);
                let current = self.orders.update(&order.id, current).await?;
                info!(order_id = %current.id, %tracking_id, %status, "courier status synced");

                Ok(Ok(FreshStatus {
                    order_id: current.id,
                    tracking_id: tracking_id.to_string(),
                    provider,
                    status,
                    synced_at,
                }))
            }
            Err(e) => {
                warn!(order_id = %order.id, %tracking_id, error = %e, "courier status unavailable, serving last known value");
                let courier = order.courier.as_ref();
                Ok(Err(StaleStatus {
                    order_id: order.id,
                    tracking_id: tracking_id.to_string(),
                    provider,
                    status: courier.and_then(|c| c.status.clone()),
                    last_status_sync_at: courier.and_then(|c| c.last_status_sync_at),
                    reason: e.to_string(),
                }))
            }
        }
    }

    /// Fetch the courier's tracking timeline, newest first. Nothing is persisted.
    pub async fn list_events(&self, tracking_id: &str) -> ShopResult<Result<Timeline, StaleTimeline>> {
        let order = self.find_by_tracking_id(tracking_id).await?;
        let provider = self.provider_of(&order);

        let read = match provider.as_deref() {
            Some(provider) => self.fetch_events(provider, tracking_id).await,
            None => Err(CourierError::NotConfigured {
                provider: "default".to_string(),
            }),
        };

        match read {
            Ok(mut events) => {
                sort_newest_first(&mut events);
                Ok(Ok(Timeline {
                    tracking_id: tracking_id.to_string(),
                    provider: provider.unwrap_or_default(),
                    events,
                }))
            }
            Err(e) => {
                warn!(order_id = %order.id, %tracking_id, error = %e, "courier timeline unavailable");
                Ok(Err(StaleTimeline {
                    tracking_id: tracking_id.to_string(),
                    events: Vec::new(),
                    reason: e.to_string(),
                }))
            }
        }
    }

    async fn fetch_status(&self, provider: &str, tracking_id: &str) -> Result<String, CourierError> {
        let (adapter, endpoint) = self.resolve(provider)?;
        let response = self
            .client
            .get_json(endpoint, &adapter.status_path(tracking_id))
            .await?;
        adapter
            .delivery_status(&response)
            .ok_or_else(|| CourierError::MalformedResponse {
                provider: provider.to_string(),
                message: "no delivery status in response".to_string(),
            })
    }

    async fn fetch_events(&self, provider: &str, tracking_id: &str) -> Result<Vec<TrackingEvent>, CourierError> {
        let (adapter, endpoint) = self.resolve(provider)?;
        let response = self
            .client
            .get_json(endpoint, &adapter.events_path(tracking_id))
            .await?;
        adapter
            .events(&response)
            .ok_or_else(|| CourierError::MalformedResponse {
                provider: provider.to_string(),
                message: "no tracking events in response".to_string(),
            })
    }

    fn resolve(&self, provider: &str) -> Result<(Arc<dyn CourierAdapter>, &CourierEndpoint), CourierError> {
        let adapter = self.registry.get(provider)?;
        let endpoint = self
            .endpoints
            .get(provider)
            .ok_or_else(|| CourierError::NotConfigured {
                provider: provider.to_string(),
            })?;
        Ok((adapter, endpoint))
    }

    fn provider_of(&self, order: &Order) -> Option<String> {
        order
            .courier
            .as_ref()
            .map(|c| c.provider.clone())
            .or_else(|| self.default_provider.clone())
    }

    async fn find_by_tracking_id(&self, tracking_id: &str) -> ShopResult<Order> {
        self.orders
            .search("tracking_id", tracking_id)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| {
                EntityError::NotFoundBy {
                    entity_type: "order".to_string(),
                    field: "tracking_id".to_string(),
                    value: tracking_id.to_string(),
                }
                .into()
            })
    }
}

/// Couriers reject consignments without a reachable recipient
fn check_dispatchable(order: &Order) -> Result<(), CourierError> {
    let required = [
        ("customer_name", &order.customer_name),
        ("customer_phone", &order.customer_phone),
        ("customer_address", &order.customer_address),
    ];
    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(CourierError::InvalidOrder {
                field: field.to_string(),
                message: "is required".to_string(),
            });
        }
    }
    if !order.total_amount.is_finite() || order.total_amount < 0.0 {
        return Err(CourierError::InvalidOrder {
            field: "total_amount".to_string(),
            message: "must be a non-negative amount".to_string(),
        });
    }
    Ok(())
}
