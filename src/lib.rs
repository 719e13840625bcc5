//! # Storefront
//!
//! Backend core for a small e-commerce shop.
//!
//! ## Features
//!
//! - **Dense display ordering**: categories, products and sliders keep their
//!   `order` field equal to `1..N` through inserts, moves and removals
//! - **Courier dispatch**: hand an order to Steadfast, Pathao or RedX and
//!   store the tracking code they return
//! - **Graceful tracking reads**: a courier outage serves the last persisted
//!   status instead of failing or overwriting it
//! - **Pluggable storage**: in-memory by default, MongoDB behind the
//!   `mongodb_backend` feature
//! - **Configuration-Based**: YAML configuration with `STOREFRONT_*`
//!   environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storefront::prelude::*;
//!
//! let mut config = StoreConfig::from_yaml_file("storefront.yaml")?;
//! config.apply_env_overrides()?;
//! config.validate()?;
//!
//! let bind = config.server.bind.clone();
//! ServerBuilder::new()
//!     .with_config(config)
//!     .with_configured_storage()
//!     .await?
//!     .serve(&bind)
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod courier;
pub mod entities;
pub mod ordering;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core Traits ===
    pub use crate::core::{
        Data, DataService, Entity, FieldValue, Orderable, ShopError, ShopResult,
    };

    // === Entities ===
    pub use crate::entities::{
        CatalogEntity, Category, CourierInfo, CreateOrder, Order, OrderStatus, Product, Slider,
    };

    // === Ordering ===
    pub use crate::ordering::OrderedCollection;

    // === Courier ===
    pub use crate::courier::{
        CourierAdapter, CourierClient, CourierRegistry, OrderStatusTracker, StatusReport,
        TimelineReport,
    };

    // === Storage ===
    pub use crate::storage::InMemoryDataService;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoDataService;

    // === Config ===
    pub use crate::config::{CourierEndpoint, StorageBackend, StoreConfig};

    // === Server ===
    pub use crate::server::{EntityDescriptor, EntityRegistry, ServerBuilder};

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
