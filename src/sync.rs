//! Thread-safe wrapper for concurrent index access.
//!
//! [`QuadTree`] itself is synchronous and unsynchronized. `SharedIndex`
//! wraps it in an `Arc<RwLock<...>>` so request handlers on multiple threads
//! can share one index: mutations take the write lock, queries take the read
//! lock. Because a whole insert runs under one write-lock acquisition, a
//! subdivision and its entry redistribution are observed atomically; no
//! reader can see a leaf mid-split.
//!
//! # Examples
//!
//! ```
//! use proxima::{BoundingBox, Location, SharedIndex};
//! use std::thread;
//!
//! let index = SharedIndex::new(BoundingBox::world(), 4).unwrap();
//!
//! let writer = index.clone();
//! let handle = thread::spawn(move || {
//!     writer.insert("cafe-1", Location::new(52.52, 13.40));
//! });
//! handle.join().unwrap();
//!
//! let hits = index.query(&Location::new(52.52, 13.40), 1.0);
//! assert_eq!(hits.len(), 1);
//! ```

use crate::bbox::BoundingBox;
use crate::error::Result;
use crate::quadtree::{IndexStats, QuadTree, QueryHit};
use crate::types::{Config, Location};
use parking_lot::RwLock;
use std::sync::Arc;

/// Clone-to-share handle around a [`QuadTree`] guarded by a reader-writer
/// lock. Reads run concurrently; writes are exclusive. Coarse-grained
/// locking is fine here: every operation is a logarithmic descent, so lock
/// hold times stay short.
#[derive(Clone)]
pub struct SharedIndex {
    inner: Arc<RwLock<QuadTree>>,
}

impl SharedIndex {
    /// Create a shared index covering `bounds`.
    pub fn new(bounds: BoundingBox, leaf_capacity: usize) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(QuadTree::new(bounds, leaf_capacity)?)),
        })
    }

    /// Create a shared index from a validated [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            inner: Arc::new(RwLock::new(QuadTree::from_config(config)?)),
        })
    }

    /// Insert a record under the write lock.
    pub fn insert(&self, id: impl Into<String>, location: Location) {
        self.inner.write().insert(id, location);
    }

    /// Delete a record under the write lock.
    pub fn delete(&self, id: &str, location: &Location) -> bool {
        self.inner.write().delete(id, location)
    }

    /// Radius query under the read lock.
    pub fn query(&self, center: &Location, radius_km: f64) -> Vec<QueryHit> {
        self.inner.read().query(center, radius_km)
    }

    /// Number of records currently indexed.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Structural counters for the underlying tree.
    pub fn stats(&self) -> IndexStats {
        self.inner.read().stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shared_handles_see_the_same_tree() {
        let index = SharedIndex::new(BoundingBox::world(), 3).unwrap();
        let other = index.clone();

        index.insert("b1", Location::new(1.0, 1.0));
        assert_eq!(other.len(), 1);

        assert!(other.delete("b1", &Location::new(1.0, 1.0)));
        assert!(index.is_empty());
    }

    #[test]
    fn queries_never_observe_a_partial_subdivision() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::thread;

        let index = SharedIndex::new(BoundingBox::world(), 2).unwrap();
        let committed = Arc::new(AtomicUsize::new(0));
        let points: Vec<(String, Location)> = (0..64)
            .map(|i| {
                (
                    format!("b{i}"),
                    Location::new((i % 16) as f64, (i / 16) as f64),
                )
            })
            .collect();

        let writer = index.clone();
        let writer_committed = committed.clone();
        let to_insert = points.clone();
        let write_handle = thread::spawn(move || {
            for (id, location) in to_insert {
                writer.insert(id, location);
                writer_committed.fetch_add(1, Ordering::Release);
            }
        });

        let reader = index.clone();
        let reader_committed = committed.clone();
        let read_handle = thread::spawn(move || {
            for _ in 0..200 {
                // Whatever was committed before the query began must be
                // visible; a torn subdivision would briefly drop records.
                let floor = reader_committed.load(Ordering::Acquire);
                let hits = reader.query(&Location::new(7.5, 7.5), 21_000.0);
                assert!(
                    hits.len() >= floor,
                    "query saw {} records but {floor} inserts had committed",
                    hits.len()
                );
            }
        });

        write_handle.join().unwrap();
        read_handle.join().unwrap();

        assert_eq!(index.len(), 64);
        let hits = index.query(&Location::new(7.5, 1.5), 21_000.0);
        assert_eq!(hits.len(), 64);
    }
}
