//! In-memory quadtree proximity index and nearby-business search service.
//!
//! ```rust
//! use proxima::{Location, NearbySearchRequest, NewBusiness, ServiceBuilder};
//!
//! let service = ServiceBuilder::new().build()?;
//!
//! service.create(NewBusiness {
//!     name: "Corner Deli".to_string(),
//!     location: Location::new(40.7128, -74.0060),
//!     phone: "555-0142".to_string(),
//!     city: "New York".to_string(),
//!     state: "NY".to_string(),
//!     zip_code: "10007".to_string(),
//! })?;
//!
//! let nearby = service.nearby(&NearbySearchRequest {
//!     center: Location::new(40.7130, -74.0050),
//!     radius_km: 2.0,
//! })?;
//! assert_eq!(nearby.len(), 1);
//! # Ok::<(), proxima::ProximaError>(())
//! ```

pub mod bbox;
pub mod builder;
pub mod error;
pub mod quadtree;
pub mod service;
pub mod spatial;
pub mod store;
pub mod sync;
pub mod types;

pub use bbox::BoundingBox;
pub use builder::ServiceBuilder;
pub use error::{ProximaError, Result};
pub use quadtree::{IndexStats, QuadTree, QueryHit};
pub use service::ProximityService;
pub use spatial::haversine_km;
pub use store::{BusinessStore, MemoryStore};
pub use sync::SharedIndex;
pub use types::{Business, Config, Location, NearbySearchRequest, NewBusiness};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Common imports
pub mod prelude {
    pub use crate::{
        BoundingBox, Business, BusinessStore, Config, Location, MemoryStore, NearbySearchRequest,
        NewBusiness, ProximaError, ProximityService, QuadTree, QueryHit, Result, ServiceBuilder,
        SharedIndex, haversine_km,
    };
}
