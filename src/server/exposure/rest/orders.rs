//! REST handlers for purchase orders and courier tracking

use crate::core::{EntityError, EntityId, JsonBody, OrderError, ShopResult, ValidJson};
use crate::courier::{StatusReport, TimelineReport};
use crate::entities::{CreateOrder, Order, StatusChange};
use crate::server::host::ServerHost;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Optional body of `POST /orders/{id}/dispatch`
#[derive(Debug, Default, Deserialize)]
pub struct DispatchRequest {
    #[serde(default)]
    pub provider: Option<String>,
}

pub fn routes(host: Arc<ServerHost>) -> Router {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", patch(change_status))
        .route("/orders/{id}/dispatch", post(dispatch))
        .route("/tracking/{tracking_id}/status", get(tracking_status))
        .route("/tracking/{tracking_id}/events", get(tracking_events))
        .with_state(host)
}

/// Newest orders first
async fn list_orders(State(host): State<Arc<ServerHost>>) -> ShopResult<Json<Vec<Order>>> {
    let mut orders = host.orders.list().await?;
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(Json(orders))
}

async fn create_order(
    State(host): State<Arc<ServerHost>>,
    ValidJson(input): ValidJson<CreateOrder>,
) -> ShopResult<(StatusCode, Json<Order>)> {
    let order = host.orders.create(Order::from_create(input)).await?;
    info!(order_id = %order.id, invoice = %order.invoice, total = order.total_amount, "order placed");
    Ok((StatusCode::CREATED, Json(order)))
}

async fn get_order(
    State(host): State<Arc<ServerHost>>,
    EntityId(id): EntityId,
) -> ShopResult<Json<Order>> {
    Ok(Json(load(&host, id).await?))
}

async fn change_status(
    State(host): State<Arc<ServerHost>>,
    EntityId(id): EntityId,
    JsonBody(change): JsonBody<StatusChange>,
) -> ShopResult<Json<Order>> {
    let _guard = host.tracker.lock_order(&id).await;
    let mut order = load(&host, id).await?;

    if order.status.is_terminal() {
        return Err(OrderError::Terminal {
            status: order.status.to_string(),
        }
        .into());
    }
    if !order.status.can_transition_to(change.status) {
        return Err(OrderError::InvalidTransition {
            from: order.status.to_string(),
            to: change.status.to_string(),
        }
        .into());
    }

    let from = order.status;
    order.status = change.status;
    order.touch();
    let order = host.orders.update(&id, order).await?;

    info!(order_id = %id, %from, to = %order.status, "order status changed");
    Ok(Json(order))
}

async fn dispatch(
    State(host): State<Arc<ServerHost>>,
    EntityId(id): EntityId,
    body: Bytes,
) -> ShopResult<Json<Order>> {
    let request: DispatchRequest = if body.iter().all(u8::is_ascii_whitespace) {
        DispatchRequest::default()
    } else {
        serde_json::from_slice(&body)?
    };

    let order = host
        .tracker
        .dispatch_to_courier(&id, request.provider.as_deref())
        .await?;
    Ok(Json(order))
}

async fn tracking_status(
    State(host): State<Arc<ServerHost>>,
    Path(tracking_id): Path<String>,
) -> ShopResult<Json<StatusReport>> {
    let read = host.tracker.refresh_status(&tracking_id).await?;
    Ok(Json(read.into()))
}

async fn tracking_events(
    State(host): State<Arc<ServerHost>>,
    Path(tracking_id): Path<String>,
) -> ShopResult<Json<TimelineReport>> {
    let read = host.tracker.list_events(&tracking_id).await?;
    Ok(Json(read.into()))
}

async fn load(host: &ServerHost, id: uuid::Uuid) -> ShopResult<Order> {
    host.orders.get(&id).await?.ok_or_else(|| {
        EntityError::NotFound {
            entity_type: "order".to_string(),
            id,
        }
        .into()
    })
}
