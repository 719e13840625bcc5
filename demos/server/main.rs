//! Storefront server: loads `storefront.yaml`, applies `STOREFRONT_*`
//! overrides and serves the REST API.
//!
//! ```sh
//! RUST_LOG=storefront=debug,tower_http=info \
//!     cargo run --example storefront_server -- demos/server/storefront.yaml
//! ```

use storefront::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/server/storefront.yaml".to_string());

    let mut config = StoreConfig::from_yaml_file(&path)?;
    config.apply_env_overrides()?;
    config.validate()?;

    println!("🛒 Storefront");
    println!("   storage:  {:?}", config.storage.backend);
    println!(
        "   couriers: {}",
        config
            .couriers
            .iter()
            .map(|c| c.provider.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let bind = config.bind_addr()?.to_string();
    println!("   listening on http://{}\n", bind);
    println!("   GET  /categories            sorted categories");
    println!("   PUT  /categories/{{id}}/position");
    println!("   POST /orders/{{id}}/dispatch  hand an order to a courier");
    println!("   GET  /tracking/{{code}}/status\n");

    ServerBuilder::new()
        .with_config(config)
        .with_configured_storage()
        .await?
        .serve(&bind)
        .await
}
