//! ServerBuilder for fluent API to build the storefront HTTP server

use super::entity_registry::{CollectionDescriptor, EntityRegistry};
use super::exposure::RestExposure;
use super::host::ServerHost;
use crate::config::{StorageBackend, StoreConfig};
use crate::core::{ConfigError, DataService, ShopResult, StorageError};
use crate::courier::{CourierClient, CourierRegistry, OrderStatusTracker};
use crate::entities::{CatalogEntity, Category, Order, Product, Slider};
use crate::ordering::OrderedCollection;
use crate::storage::InMemoryDataService;
use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;

/// Builder for the storefront server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_config(config)
///     .with_configured_storage()
///     .await?
///     .build()?;
/// ```
pub struct ServerBuilder {
    config: StoreConfig,
    entity_registry: EntityRegistry,
    orders: Option<Arc<dyn DataService<Order>>>,
    courier_registry: Option<CourierRegistry>,
    custom_routes: Vec<Router>,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            config: StoreConfig::default(),
            entity_registry: EntityRegistry::new(),
            orders: None,
            courier_registry: None,
            custom_routes: Vec::new(),
        }
    }

    /// Use a loaded configuration (courier accounts, storage, bind address)
    pub fn with_config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    /// Register an ordered catalog collection backed by `service`
    pub fn with_collection<T: CatalogEntity>(mut self, service: impl DataService<T> + 'static) -> Self {
        let collection = OrderedCollection::new(Arc::new(service));
        self.entity_registry
            .register(Box::new(CollectionDescriptor::new(collection)));
        self
    }

    /// Set the order storage (required)
    pub fn with_order_service(mut self, service: impl DataService<Order> + 'static) -> Self {
        self.orders = Some(Arc::new(service));
        self
    }

    /// Replace the builtin courier adapters
    pub fn with_courier_registry(mut self, registry: CourierRegistry) -> Self {
        self.courier_registry = Some(registry);
        self
    }

    /// Add routes that sit next to the generated ones
    ///
    /// ```ignore
    /// let admin = Router::new().route("/admin/ping", get(|| async { "pong" }));
    /// ServerBuilder::new().with_custom_routes(admin)
    /// ```
    pub fn with_custom_routes(mut self, routes: Router) -> Self {
        self.custom_routes.push(routes);
        self
    }

    /// Register categories, products, sliders and orders on the backend
    /// named in the configuration.
    pub async fn with_configured_storage(self) -> ShopResult<Self> {
        match self.config.storage.backend {
            StorageBackend::InMemory => Ok(self
                .with_collection(InMemoryDataService::<Category>::new())
                .with_collection(InMemoryDataService::<Product>::new())
                .with_collection(InMemoryDataService::<Slider>::new())
                .with_order_service(InMemoryDataService::<Order>::new())),
            StorageBackend::Mongodb => self.with_mongodb().await,
        }
    }

    #[cfg(feature = "mongodb_backend")]
    async fn with_mongodb(self) -> ShopResult<Self> {
        use crate::storage::MongoDataService;
        use crate::storage::mongodb::connect;

        let (uri, database) = match (&self.config.storage.uri, &self.config.storage.database) {
            (Some(uri), Some(database)) => (uri.clone(), database.clone()),
            (None, _) => {
                return Err(ConfigError::MissingField {
                    field: "uri".into(),
                    context: "storage".into(),
                }
                .into());
            }
            (_, None) => {
                return Err(ConfigError::MissingField {
                    field: "database".into(),
                    context: "storage".into(),
                }
                .into());
            }
        };

        let db = connect(&uri, &database)
            .await
            .map_err(|e| StorageError::ConnectionError {
                backend: "mongodb".into(),
                message: format!("{:#}", e),
            })?;
        tracing::info!(%database, "connected to MongoDB");

        Ok(self
            .with_collection(MongoDataService::<Category>::new(db.clone()))
            .with_collection(MongoDataService::<Product>::new(db.clone()))
            .with_collection(MongoDataService::<Slider>::new(db.clone()))
            .with_order_service(MongoDataService::<Order>::new(db)))
    }

    #[cfg(not(feature = "mongodb_backend"))]
    async fn with_mongodb(self) -> ShopResult<Self> {
        Err(StorageError::Unavailable {
            backend: "mongodb".into(),
        }
        .into())
    }

    /// Build the host holding every collection and the order tracker
    pub fn build_host(mut self) -> ShopResult<ServerHost> {
        let orders = self.orders.take().ok_or_else(|| ConfigError::MissingField {
            field: "orders".into(),
            context: "ServerBuilder (call .with_order_service())".into(),
        })?;

        let tracker = match self.courier_registry.take() {
            Some(registry) => OrderStatusTracker::new(
                orders.clone(),
                registry,
                CourierClient::new(self.config.courier_timeout())?,
                self.config.couriers.clone(),
                self.config.default_courier.clone(),
            ),
            None => OrderStatusTracker::from_config(orders.clone(), &self.config)?,
        };

        Ok(ServerHost::new(
            self.config,
            self.entity_registry,
            orders,
            tracker,
        ))
    }

    /// Build the final REST router
    pub fn build(mut self) -> ShopResult<Router> {
        let custom_routes = std::mem::take(&mut self.custom_routes);
        let host = Arc::new(self.build_host()?);
        Ok(RestExposure::build_router(host, custom_routes))
    }

    /// Serve the application with graceful shutdown
    ///
    /// Binds to `addr`, serves requests, and drains on SIGTERM or Ctrl+C.
    pub async fn serve(self, addr: &str) -> Result<()> {
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for SIGTERM or SIGINT (Ctrl+C)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
