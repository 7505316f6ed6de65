//! The proximity search service: durable store + spatial index, wired
//! together as an explicitly constructed object.
//!
//! The service owns a handle to the record store and a [`SharedIndex`]. On
//! every create/update/delete it keeps the index in step with the store; on
//! a nearby search it lets the index produce candidate IDs and resolves each
//! against the store before sorting by distance. Construction warms the
//! index from `fetch_all`, which doubles as the rebuild path when tree
//! growth under churn warrants compaction.

use crate::error::{ProximaError, Result};
use crate::store::BusinessStore;
use crate::sync::SharedIndex;
use crate::types::{Business, Config, NearbySearchRequest, NewBusiness};
use std::sync::Arc;
use uuid::Uuid;

/// Business search over a durable store, accelerated by a quadtree index.
///
/// Cheap to clone; clones share the same store and index.
///
/// # Examples
///
/// ```
/// use proxima::{Config, Location, MemoryStore, NearbySearchRequest, NewBusiness, ProximityService};
/// use std::sync::Arc;
///
/// # fn main() -> proxima::Result<()> {
/// let service = ProximityService::new(Arc::new(MemoryStore::new()), &Config::default())?;
///
/// service.create(NewBusiness {
///     name: "Blue Bottle".to_string(),
///     location: Location::new(37.7763, -122.4233),
///     phone: "555-0199".to_string(),
///     city: "San Francisco".to_string(),
///     state: "CA".to_string(),
///     zip_code: "94102".to_string(),
/// })?;
///
/// let nearby = service.nearby(&NearbySearchRequest {
///     center: Location::new(37.7749, -122.4194),
///     radius_km: 5.0,
/// })?;
/// assert_eq!(nearby.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ProximityService {
    store: Arc<dyn BusinessStore>,
    index: SharedIndex,
}

impl ProximityService {
    /// Build a service over `store` and warm the index with every record the
    /// store currently holds.
    pub fn new(store: Arc<dyn BusinessStore>, config: &Config) -> Result<Self> {
        let index = SharedIndex::from_config(config)?;
        let records = store.fetch_all()?;
        let count = records.len();
        for business in records {
            index.insert(business.id, business.location);
        }
        log::info!("proximity index warmed with {count} records");
        Ok(Self { store, index })
    }

    /// Register a new business: assigns a UUID, persists the record, and
    /// indexes its location.
    pub fn create(&self, new: NewBusiness) -> Result<Business> {
        let business = new.into_business(Uuid::new_v4().to_string());
        self.store.put(&business)?;
        self.index
            .insert(business.id.clone(), business.location);
        Ok(business)
    }

    /// Register several businesses in one call.
    pub fn create_many(&self, batch: Vec<NewBusiness>) -> Result<Vec<Business>> {
        batch.into_iter().map(|new| self.create(new)).collect()
    }

    /// Update an existing business by ID.
    ///
    /// The stale index entry is removed at the previously stored location
    /// before the new one is inserted; the index has no update-in-place.
    ///
    /// # Errors
    ///
    /// `ProximaError::NotFound` if the ID is unknown.
    pub fn update(&self, business: Business) -> Result<Business> {
        let existing = self
            .store
            .fetch_by_id(&business.id)?
            .ok_or_else(|| ProximaError::NotFound(business.id.clone()))?;

        let updated = Business {
            distance_km: None,
            ..business
        };
        self.index.delete(&updated.id, &existing.location);
        self.store.put(&updated)?;
        self.index.insert(updated.id.clone(), updated.location);
        Ok(updated)
    }

    /// Remove a business by ID from both store and index.
    ///
    /// # Errors
    ///
    /// `ProximaError::NotFound` if the ID is unknown.
    pub fn delete(&self, id: &str) -> Result<Business> {
        let removed = self
            .store
            .delete(id)?
            .ok_or_else(|| ProximaError::NotFound(id.to_string()))?;
        self.index.delete(id, &removed.location);
        Ok(removed)
    }

    /// Fetch a business by ID.
    ///
    /// # Errors
    ///
    /// `ProximaError::NotFound` if the ID is unknown.
    pub fn get(&self, id: &str) -> Result<Business> {
        self.store
            .fetch_by_id(id)?
            .ok_or_else(|| ProximaError::NotFound(id.to_string()))
    }

    /// Businesses within the requested radius, nearest first.
    ///
    /// Candidate IDs come from the index; each is resolved against the store
    /// and annotated with its distance. The sort is stable, so equidistant
    /// records keep their encounter order.
    pub fn nearby(&self, request: &NearbySearchRequest) -> Result<Vec<Business>> {
        let hits = self.index.query(&request.center, request.radius_km);
        let mut results = Vec::with_capacity(hits.len());
        for hit in hits {
            match self.store.fetch_by_id(&hit.id)? {
                Some(mut business) => {
                    business.distance_km = Some(hit.distance_km);
                    results.push(business);
                }
                None => {
                    log::warn!("index hit {:?} has no record in the store", hit.id);
                }
            }
        }
        sort_by_distance(&mut results);
        Ok(results)
    }

    /// Full-scan variant of [`nearby`](Self::nearby) that bypasses the
    /// index: every stored record is distance-checked. Kept for debugging
    /// and for cross-checking index results in tests.
    pub fn scan_within_radius(&self, request: &NearbySearchRequest) -> Result<Vec<Business>> {
        let mut results: Vec<Business> = self
            .store
            .fetch_all()?
            .into_iter()
            .filter_map(|mut business| {
                let distance_km =
                    crate::spatial::haversine_km(&request.center, &business.location);
                (distance_km <= request.radius_km).then(|| {
                    business.distance_km = Some(distance_km);
                    business
                })
            })
            .collect();
        sort_by_distance(&mut results);
        Ok(results)
    }

    /// Structural counters of the underlying index.
    pub fn index_stats(&self) -> crate::quadtree::IndexStats {
        self.index.stats()
    }
}

fn sort_by_distance(results: &mut [Business]) {
    results.sort_by(|a, b| {
        a.distance_km
            .partial_cmp(&b.distance_km)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::types::Location;

    fn new_business(name: &str, latitude: f64, longitude: f64) -> NewBusiness {
        NewBusiness {
            name: name.to_string(),
            location: Location::new(latitude, longitude),
            phone: "555-0100".to_string(),
            city: "Metropolis".to_string(),
            state: "NY".to_string(),
            zip_code: "10001".to_string(),
        }
    }

    fn service() -> ProximityService {
        ProximityService::new(Arc::new(MemoryStore::new()), &Config::default()).unwrap()
    }

    #[test]
    fn create_assigns_distinct_ids_and_indexes() {
        let service = service();
        let a = service.create(new_business("a", 1.0, 1.0)).unwrap();
        let b = service.create(new_business("b", 2.0, 2.0)).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(service.index_stats().records, 2);
        assert_eq!(service.get(&a.id).unwrap().name, "a");
    }

    #[test]
    fn update_moves_the_index_entry() {
        let service = service();
        let created = service.create(new_business("mover", 10.0, 10.0)).unwrap();

        let moved = Business {
            location: Location::new(-30.0, -30.0),
            ..created.clone()
        };
        service.update(moved).unwrap();

        // No hit at the old location, one at the new.
        let old = service
            .nearby(&NearbySearchRequest {
                center: Location::new(10.0, 10.0),
                radius_km: 50.0,
            })
            .unwrap();
        assert!(old.is_empty());

        let new = service
            .nearby(&NearbySearchRequest {
                center: Location::new(-30.0, -30.0),
                radius_km: 50.0,
            })
            .unwrap();
        assert_eq!(new.len(), 1);
        assert_eq!(new[0].id, created.id);
        assert_eq!(service.index_stats().records, 1);
    }

    #[test]
    fn update_of_unknown_id_is_not_found() {
        let service = service();
        let err = service
            .update(Business {
                id: "missing".to_string(),
                name: String::new(),
                location: Location::new(0.0, 0.0),
                phone: String::new(),
                city: String::new(),
                state: String::new(),
                zip_code: String::new(),
                distance_km: None,
            })
            .unwrap_err();
        assert!(matches!(err, ProximaError::NotFound(_)));
    }

    #[test]
    fn delete_removes_from_store_and_index() {
        let service = service();
        let created = service.create(new_business("gone", 5.0, 5.0)).unwrap();

        let removed = service.delete(&created.id).unwrap();
        assert_eq!(removed.id, created.id);
        assert!(matches!(
            service.get(&created.id),
            Err(ProximaError::NotFound(_))
        ));
        assert_eq!(service.index_stats().records, 0);
        assert!(matches!(
            service.delete(&created.id),
            Err(ProximaError::NotFound(_))
        ));
    }

    #[test]
    fn warm_up_indexes_existing_records() {
        let store = Arc::new(MemoryStore::new());
        let seeded = ProximityService::new(store.clone(), &Config::default()).unwrap();
        seeded.create(new_business("seed-1", 0.0, 0.0)).unwrap();
        seeded.create(new_business("seed-2", 0.0, 1.0)).unwrap();

        // A fresh service over the same store rebuilds the index.
        let rebuilt = ProximityService::new(store, &Config::default()).unwrap();
        assert_eq!(rebuilt.index_stats().records, 2);
        let nearby = rebuilt
            .nearby(&NearbySearchRequest {
                center: Location::new(0.0, 0.5),
                radius_km: 100.0,
            })
            .unwrap();
        assert_eq!(nearby.len(), 2);
    }

    #[test]
    fn nearby_sorts_ascending_by_distance() {
        let service = service();
        service.create(new_business("far", 0.0, 3.0)).unwrap();
        service.create(new_business("near", 0.0, 1.0)).unwrap();
        service.create(new_business("mid", 0.0, 2.0)).unwrap();

        let results = service
            .nearby(&NearbySearchRequest {
                center: Location::new(0.0, 0.0),
                radius_km: 500.0,
            })
            .unwrap();
        let names: Vec<_> = results.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["near", "mid", "far"]);
        assert!(results.iter().all(|b| b.distance_km.is_some()));
    }

    #[test]
    fn scan_and_index_paths_agree() {
        let service = service();
        for i in 0..12 {
            service
                .create(new_business(
                    &format!("b{i}"),
                    (i as f64) * 3.0 - 18.0,
                    (i as f64) * 5.0 - 30.0,
                ))
                .unwrap();
        }
        let request = NearbySearchRequest {
            center: Location::new(0.0, 0.0),
            radius_km: 2_000.0,
        };

        let indexed = service.nearby(&request).unwrap();
        let scanned = service.scan_within_radius(&request).unwrap();

        let mut indexed_ids: Vec<_> = indexed.iter().map(|b| b.id.clone()).collect();
        let mut scanned_ids: Vec<_> = scanned.iter().map(|b| b.id.clone()).collect();
        indexed_ids.sort();
        scanned_ids.sort();
        assert_eq!(indexed_ids, scanned_ids);
    }
}
