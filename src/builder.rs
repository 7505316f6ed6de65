//! Builder for flexible service construction.

use crate::bbox::BoundingBox;
use crate::error::Result;
use crate::service::ProximityService;
use crate::store::{BusinessStore, MemoryStore};
use crate::types::Config;
use std::sync::Arc;

/// Fluent constructor for [`ProximityService`].
///
/// Defaults to an empty [`MemoryStore`] and the world-covering index
/// configuration.
///
/// # Examples
///
/// ```
/// use proxima::ServiceBuilder;
///
/// let service = ServiceBuilder::new().leaf_capacity(8).build().unwrap();
/// assert_eq!(service.index_stats().records, 0);
/// ```
pub struct ServiceBuilder {
    store: Option<Arc<dyn BusinessStore>>,
    config: Config,
}

impl ServiceBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self {
            store: None,
            config: Config::default(),
        }
    }

    /// Use the given durable store.
    pub fn store(mut self, store: Arc<dyn BusinessStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Set the leaf capacity of the index.
    pub fn leaf_capacity(mut self, capacity: usize) -> Self {
        self.config.leaf_capacity = capacity;
        self
    }

    /// Scope the index root to `bounds` instead of the whole world.
    /// Inserts outside this box are dropped.
    pub fn root_bounds(mut self, bounds: BoundingBox) -> Self {
        self.config.root_origin_lat = bounds.origin_lat;
        self.config.root_origin_lon = bounds.origin_lon;
        self.config.root_lat_extent = bounds.lat_extent;
        self.config.root_lon_extent = bounds.lon_extent;
        self
    }

    /// Build the service, warming the index from the store.
    pub fn build(self) -> Result<ProximityService> {
        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryStore::new()) as Arc<dyn BusinessStore>);
        ProximityService::new(store, &self.config)
    }
}

impl Default for ServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, NewBusiness};

    #[test]
    fn builder_applies_root_scope() {
        let service = ServiceBuilder::new()
            .root_bounds(BoundingBox::new(0.0, 0.0, 10.0, 10.0).unwrap())
            .build()
            .unwrap();

        // Inside the scoped root: indexed. Outside: dropped.
        service
            .create(NewBusiness {
                name: "in".to_string(),
                location: Location::new(5.0, 5.0),
                phone: String::new(),
                city: String::new(),
                state: String::new(),
                zip_code: String::new(),
            })
            .unwrap();
        service
            .create(NewBusiness {
                name: "out".to_string(),
                location: Location::new(50.0, 50.0),
                phone: String::new(),
                city: String::new(),
                state: String::new(),
                zip_code: String::new(),
            })
            .unwrap();

        assert_eq!(service.index_stats().records, 1);
    }

    #[test]
    fn invalid_config_fails_the_build() {
        let builder = ServiceBuilder::new().leaf_capacity(0);
        assert!(builder.build().is_err());
    }
}
