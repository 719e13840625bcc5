//! REST API exposure for the storefront
//!
//! The REST exposure consumes a `ServerHost` and produces an Axum `Router`
//! carrying the catalog collections, the order routes and health checks.

pub mod collections;
pub mod orders;

use super::super::host::ServerHost;
use axum::{Json, Router, routing::get};
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub struct RestExposure;

impl RestExposure {
    /// Build the REST router from a host
    ///
    /// Returns a router with:
    /// - Health check routes
    /// - Ordered CRUD routes for each registered collection
    /// - Order and tracking routes
    /// - Custom routes
    pub fn build_router(host: Arc<ServerHost>, custom_routes: Vec<Router>) -> Router {
        let mut app = Self::health_routes()
            .merge(host.entity_registry.build_routes())
            .merge(orders::routes(host.clone()));

        for custom_router in custom_routes {
            app = app.merge(custom_router);
        }

        app.layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    fn health_routes() -> Router {
        Router::new()
            .route("/health", get(Self::health_check))
            .route("/healthz", get(Self::health_check))
    }

    async fn health_check() -> Json<Value> {
        Json(json!({
            "status": "ok",
            "service": "storefront-rs"
        }))
    }
}
