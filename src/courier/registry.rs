//! Lookup table from provider name to adapter

use super::adapter::CourierAdapter;
use super::{PathaoAdapter, RedxAdapter, SteadfastAdapter};
use crate::core::CourierError;
use std::collections::HashMap;
use std::sync::Arc;

/// Registered courier adapters, keyed by [`CourierAdapter::provider`].
///
/// Adding a provider means registering one more adapter; nothing else in
/// the dispatch or tracking path branches on provider names.
#[derive(Clone, Default)]
pub struct CourierRegistry {
    adapters: HashMap<&'static str, Arc<dyn CourierAdapter>>,
}

impl CourierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Steadfast, Pathao and RedX adapters
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(SteadfastAdapter));
        registry.register(Arc::new(PathaoAdapter));
        registry.register(Arc::new(RedxAdapter));
        registry
    }

    /// Add or replace an adapter
    pub fn register(&mut self, adapter: Arc<dyn CourierAdapter>) {
        self.adapters.insert(adapter.provider(), adapter);
    }

    pub fn get(&self, provider: &str) -> Result<Arc<dyn CourierAdapter>, CourierError> {
        self.adapters
            .get(provider)
            .cloned()
            .ok_or_else(|| CourierError::UnknownProvider {
                provider: provider.to_string(),
            })
    }

    /// Registered provider names, sorted
    pub fn providers(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.adapters.keys().copied().collect();
        names.sort_unstable();
        names
    }
}
