//! Configuration loading and management
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//! storage:
//!   backend: mongodb
//!   uri: mongodb://localhost:27017
//!   database: storefront
//! default_courier: steadfast
//! courier_timeout_secs: 20
//! couriers:
//!   - provider: steadfast
//!     base_url: https://portal.packzy.com/api/v1
//!     api_key: key
//!     secret_key: secret
//! ```

use crate::core::{ConfigError, ShopResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Default courier request timeout
pub const DEFAULT_COURIER_TIMEOUT_SECS: u64 = 30;

/// HTTP listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the REST server binds to
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

/// Which storage backend to build services on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    #[default]
    InMemory,
    Mongodb,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Connection string, required for `mongodb`
    #[serde(default)]
    pub uri: Option<String>,

    /// Database name, required for `mongodb`
    #[serde(default)]
    pub database: Option<String>,
}

/// Credentials and base URL for one courier account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourierEndpoint {
    /// Provider name as known to the adapter registry (e.g. "steadfast")
    pub provider: String,

    /// API root; request paths are appended to it
    pub base_url: String,

    pub api_key: String,

    pub secret_key: String,
}

impl CourierEndpoint {
    /// Join a provider path onto the base URL
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Complete configuration for the storefront backend
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    /// Configured courier accounts, at most one per provider
    #[serde(default)]
    pub couriers: Vec<CourierEndpoint>,

    /// Provider used when a dispatch request names none
    #[serde(default)]
    pub default_courier: Option<String>,

    /// Request timeout for every courier call
    #[serde(default)]
    pub courier_timeout_secs: Option<u64>,
}

impl StoreConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> ShopResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::IoError {
                message: e.to_string(),
            },
        })?;

        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> ShopResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply `STOREFRONT_*` overrides from the process environment
    pub fn apply_env_overrides(&mut self) -> ShopResult<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from any key lookup
    ///
    /// Recognised keys: `STOREFRONT_BIND`, `STOREFRONT_STORAGE_BACKEND`,
    /// `STOREFRONT_MONGODB_URI`, `STOREFRONT_MONGODB_DATABASE`,
    /// `STOREFRONT_DEFAULT_COURIER`, `STOREFRONT_COURIER_TIMEOUT_SECS`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ShopResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup("STOREFRONT_BIND") {
            self.server.bind = bind;
        }
        if let Some(backend) = lookup("STOREFRONT_STORAGE_BACKEND") {
            self.storage.backend = match backend.as_str() {
                "in_memory" => StorageBackend::InMemory,
                "mongodb" => StorageBackend::Mongodb,
                other => {
                    return Err(ConfigError::InvalidValue {
                        field: "storage.backend".to_string(),
                        value: other.to_string(),
                        message: "expected in_memory or mongodb".to_string(),
                    }
                    .into());
                }
            };
        }
        if let Some(uri) = lookup("STOREFRONT_MONGODB_URI") {
            self.storage.uri = Some(uri);
        }
        if let Some(database) = lookup("STOREFRONT_MONGODB_DATABASE") {
            self.storage.database = Some(database);
        }
        if let Some(provider) = lookup("STOREFRONT_DEFAULT_COURIER") {
            self.default_courier = Some(provider);
        }
        if let Some(raw) = lookup("STOREFRONT_COURIER_TIMEOUT_SECS") {
            let secs = raw.parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                field: "courier_timeout_secs".to_string(),
                value: raw.clone(),
                message: e.to_string(),
            })?;
            self.courier_timeout_secs = Some(secs);
        }
        Ok(())
    }

    /// Check the configuration for values that would only fail at request time
    pub fn validate(&self) -> ShopResult<()> {
        self.bind_addr()?;

        if self.storage.backend == StorageBackend::Mongodb {
            for (field, value) in [
                ("storage.uri", &self.storage.uri),
                ("storage.database", &self.storage.database),
            ] {
                if value.as_deref().is_none_or(str::is_empty) {
                    return Err(ConfigError::MissingField {
                        field: field.to_string(),
                        context: "mongodb storage".to_string(),
                    }
                    .into());
                }
            }
        }

        for (index, courier) in self.couriers.iter().enumerate() {
            let context = format!("couriers[{}]", index);
            if !crate::courier::BUILTIN_PROVIDERS.contains(&courier.provider.as_str()) {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.provider", context),
                    value: courier.provider.clone(),
                    message: format!(
                        "expected one of {}",
                        crate::courier::BUILTIN_PROVIDERS.join(", ")
                    ),
                }
                .into());
            }
            reqwest::Url::parse(&courier.base_url).map_err(|e| ConfigError::InvalidValue {
                field: format!("{}.base_url", context),
                value: courier.base_url.clone(),
                message: e.to_string(),
            })?;
            for (field, value) in [("api_key", &courier.api_key), ("secret_key", &courier.secret_key)] {
                if value.trim().is_empty() {
                    return Err(ConfigError::MissingField {
                        field: field.to_string(),
                        context: context.clone(),
                    }
                    .into());
                }
            }
            if self.couriers[..index]
                .iter()
                .any(|c| c.provider == courier.provider)
            {
                return Err(ConfigError::InvalidValue {
                    field: format!("{}.provider", context),
                    value: courier.provider.clone(),
                    message: "provider configured twice".to_string(),
                }
                .into());
            }
        }

        if let Some(default) = &self.default_courier
            && self.courier(default).is_none()
        {
            return Err(ConfigError::InvalidValue {
                field: "default_courier".to_string(),
                value: default.clone(),
                message: "no courier entry for this provider".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Parsed listener address
    pub fn bind_addr(&self) -> ShopResult<SocketAddr> {
        self.server.bind.parse().map_err(|e: std::net::AddrParseError| {
            ConfigError::InvalidValue {
                field: "server.bind".to_string(),
                value: self.server.bind.clone(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Endpoint configured for `provider`
    pub fn courier(&self, provider: &str) -> Option<&CourierEndpoint> {
        self.couriers.iter().find(|c| c.provider == provider)
    }

    pub fn courier_timeout(&self) -> Duration {
        Duration::from_secs(
            self.courier_timeout_secs
                .unwrap_or(DEFAULT_COURIER_TIMEOUT_SECS),
        )
    }
}
