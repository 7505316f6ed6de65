//! Durable-store abstraction for canonical business records.
//!
//! The index holds only (id, location); everything else about a business is
//! owned by a store behind this trait. Production deployments back it with a
//! relational table; `MemoryStore` serves tests and embedded use.

use crate::error::Result;
use crate::types::Business;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

/// Trait for the durable record store the service reads through.
///
/// Implementations must be shareable across request handlers, so all methods
/// take `&self`; interior locking is the implementation's concern.
pub trait BusinessStore: Send + Sync {
    /// Insert or replace a record by its ID.
    fn put(&self, business: &Business) -> Result<()>;

    /// Fetch a record by ID, or `None` if absent.
    fn fetch_by_id(&self, id: &str) -> Result<Option<Business>>;

    /// Remove a record by ID, returning it if it existed.
    fn delete(&self, id: &str) -> Result<Option<Business>>;

    /// Fetch every record, for index warm-up and full scans.
    fn fetch_all(&self) -> Result<Vec<Business>>;

    /// Number of stored records.
    fn len(&self) -> Result<usize>;

    /// Whether the store holds no records.
    fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

/// In-memory store backed by a hash map.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<FxHashMap<String, Business>>,
}

impl MemoryStore {
    /// Create an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `records`, keyed by their IDs.
    pub fn with_records(records: impl IntoIterator<Item = Business>) -> Self {
        let map = records
            .into_iter()
            .map(|business| (business.id.clone(), business))
            .collect();
        Self {
            records: RwLock::new(map),
        }
    }
}

impl BusinessStore for MemoryStore {
    fn put(&self, business: &Business) -> Result<()> {
        self.records
            .write()
            .insert(business.id.clone(), business.clone());
        Ok(())
    }

    fn fetch_by_id(&self, id: &str) -> Result<Option<Business>> {
        Ok(self.records.read().get(id).cloned())
    }

    fn delete(&self, id: &str) -> Result<Option<Business>> {
        Ok(self.records.write().remove(id))
    }

    fn fetch_all(&self) -> Result<Vec<Business>> {
        Ok(self.records.read().values().cloned().collect())
    }

    fn len(&self) -> Result<usize> {
        Ok(self.records.read().len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    fn business(id: &str) -> Business {
        Business {
            id: id.to_string(),
            name: format!("business {id}"),
            location: Location::new(1.0, 2.0),
            phone: "555-0100".to_string(),
            city: "Springfield".to_string(),
            state: "OR".to_string(),
            zip_code: "97477".to_string(),
            distance_km: None,
        }
    }

    #[test]
    fn put_fetch_delete_round_trip() {
        let store = MemoryStore::new();
        store.put(&business("b1")).unwrap();

        let fetched = store.fetch_by_id("b1").unwrap().unwrap();
        assert_eq!(fetched.name, "business b1");

        let removed = store.delete("b1").unwrap();
        assert!(removed.is_some());
        assert!(store.fetch_by_id("b1").unwrap().is_none());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn put_replaces_by_id() {
        let store = MemoryStore::new();
        store.put(&business("b1")).unwrap();

        let mut updated = business("b1");
        updated.city = "Portland".to_string();
        store.put(&updated).unwrap();

        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.fetch_by_id("b1").unwrap().unwrap().city, "Portland");
    }

    #[test]
    fn with_records_keys_by_id() {
        let store = MemoryStore::with_records([business("b1"), business("b2")]);
        assert_eq!(store.len().unwrap(), 2);
        let all = store.fetch_all().unwrap();
        assert_eq!(all.len(), 2);
    }
}
