//! Adaptively-subdividing quadtree over latitude/longitude.
//!
//! The tree stores (id, location) pairs only; canonical record attributes
//! live in the durable store and are resolved by ID after a query. Regions
//! start as leaves and split into four quadrants the first time an insert
//! would push a leaf past the configured capacity. A leaf whose entries a
//! split cannot separate — co-located records, or a box already at float
//! resolution — overflows its capacity instead of splitting, so inserts
//! never fail and never lose displaced entries. Internal nodes never
//! collapse back into leaves, so the tree grows monotonically; under heavy
//! relocation churn the intended compaction path is a rebuild from the
//! durable store, not an incremental merge.
//!
//! Relocating a record is `delete(id, old)` followed by `insert(id, new)`.
//! There is no update-in-place: inserting an ID at a new location without
//! deleting the old entry first leaves a stale duplicate behind.

use crate::bbox::BoundingBox;
use crate::error::{ProximaError, Result};
use crate::spatial::haversine_km;
use crate::types::{Config, Location};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// A record returned by a radius query, annotated with its exact distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryHit {
    pub id: String,
    pub location: Location,
    pub distance_km: f64,
}

/// Structural counters, mostly useful for observing tree growth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    /// Total region nodes, internal and leaf.
    pub regions: usize,
    /// Leaf regions.
    pub leaves: usize,
    /// Records currently indexed.
    pub records: usize,
    /// Longest root-to-leaf path, in edges.
    pub depth: usize,
}

enum Node {
    Leaf { entries: FxHashMap<String, Location> },
    Internal { children: Box<[Region; 4]> },
}

struct Region {
    bounds: BoundingBox,
    node: Node,
}

/// The child that owns `location`: quadrants are disjoint and tile the
/// parent, so normally exactly one contains it. Float rounding can open an
/// ulp-wide seam between quadrants; in that case the nearest child (by
/// clamped distance) owns the location, so insert and delete descend along
/// the same path.
fn child_slot(children: &[Region; 4], location: &Location) -> usize {
    if let Some(slot) = children
        .iter()
        .position(|child| child.bounds.contains(location))
    {
        return slot;
    }
    let mut best = 0;
    let mut best_distance_km = f64::INFINITY;
    for (slot, child) in children.iter().enumerate() {
        let distance_km = haversine_km(location, &child.bounds.closest_point(location));
        if distance_km < best_distance_km {
            best_distance_km = distance_km;
            best = slot;
        }
    }
    best
}

impl Region {
    fn leaf(bounds: BoundingBox) -> Self {
        Self {
            bounds,
            node: Node::Leaf {
                entries: FxHashMap::default(),
            },
        }
    }

    /// Insert below this region. The caller has already checked containment
    /// against `self.bounds`. Returns true when a new ID was added, false on
    /// an overwrite of an existing ID.
    fn insert(&mut self, id: String, location: Location, capacity: usize) -> bool {
        match &mut self.node {
            Node::Internal { children } => {
                let slot = child_slot(children, &location);
                children[slot].insert(id, location, capacity)
            }
            Node::Leaf { entries } => {
                if entries.contains_key(&id) {
                    entries.insert(id, location);
                    return false;
                }
                if entries.len() < capacity {
                    entries.insert(id, location);
                    return true;
                }
                // A split cannot separate entries that all sit at the
                // incoming location, and a box at float resolution cannot
                // split at all; let such a leaf exceed capacity rather than
                // recurse without progress.
                if !self.bounds.splittable()
                    || entries.values().all(|existing| *existing == location)
                {
                    entries.insert(id, location);
                    return true;
                }
                self.subdivide(capacity);
                self.insert(id, location, capacity)
            }
        }
    }

    /// Split this leaf into four quadrant children and redistribute its
    /// entries through the normal insert rule. Irreversible.
    fn subdivide(&mut self, capacity: usize) {
        let Node::Leaf { entries } = &mut self.node else {
            return;
        };
        let displaced: Vec<(String, Location)> = entries.drain().collect();

        log::debug!(
            "subdividing region at ({}, {}) holding {} entries",
            self.bounds.origin_lat,
            self.bounds.origin_lon,
            displaced.len()
        );

        let children = self.bounds.quadrants().map(Region::leaf);
        self.node = Node::Internal {
            children: Box::new(children),
        };

        for (id, location) in displaced {
            let _ = self.insert(id, location, capacity);
        }
    }

    fn delete(&mut self, id: &str, location: &Location) -> bool {
        match &mut self.node {
            Node::Internal { children } => {
                let slot = child_slot(children, location);
                children[slot].delete(id, location)
            }
            Node::Leaf { entries } => entries.remove(id).is_some(),
        }
    }

    fn query(&self, center: &Location, radius_km: f64, out: &mut Vec<QueryHit>) {
        if !self.bounds.intersects_circle(center, radius_km) {
            return;
        }
        match &self.node {
            Node::Leaf { entries } => {
                for (id, location) in entries {
                    let distance_km = haversine_km(center, location);
                    if distance_km <= radius_km {
                        out.push(QueryHit {
                            id: id.clone(),
                            location: *location,
                            distance_km,
                        });
                    }
                }
            }
            Node::Internal { children } => {
                for child in children.iter() {
                    child.query(center, radius_km, out);
                }
            }
        }
    }

    fn collect_stats(&self, depth: usize, stats: &mut IndexStats) {
        stats.regions += 1;
        stats.depth = stats.depth.max(depth);
        match &self.node {
            Node::Leaf { entries } => {
                stats.leaves += 1;
                stats.records += entries.len();
            }
            Node::Internal { children } => {
                for child in children.iter() {
                    child.collect_stats(depth + 1, stats);
                }
            }
        }
    }
}

/// The spatial index: a quadtree keyed by opaque string IDs.
///
/// Every record successfully inserted and not yet deleted lives in exactly
/// one leaf whose box contains its location. The tree itself is fully
/// synchronous and unsynchronized; concurrent callers go through
/// [`SharedIndex`](crate::SharedIndex).
///
/// # Examples
///
/// ```
/// use proxima::{BoundingBox, Location, QuadTree};
///
/// let mut tree = QuadTree::new(BoundingBox::world(), 4).unwrap();
/// tree.insert("cafe-1", Location::new(52.52, 13.40));
///
/// let hits = tree.query(&Location::new(52.52, 13.40), 1.0);
/// assert_eq!(hits.len(), 1);
/// assert_eq!(hits[0].id, "cafe-1");
/// ```
pub struct QuadTree {
    root: Region,
    leaf_capacity: usize,
    records: usize,
}

impl QuadTree {
    /// Create an empty index covering `bounds`.
    ///
    /// # Errors
    ///
    /// Returns `ProximaError::InvalidInput` if `leaf_capacity` is zero.
    pub fn new(bounds: BoundingBox, leaf_capacity: usize) -> Result<Self> {
        if leaf_capacity == 0 {
            return Err(ProximaError::InvalidInput(
                "leaf capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            root: Region::leaf(bounds),
            leaf_capacity,
            records: 0,
        })
    }

    /// Create an index from a validated [`Config`].
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let bounds = BoundingBox::new(
            config.root_origin_lat,
            config.root_origin_lon,
            config.root_lat_extent,
            config.root_lon_extent,
        )?;
        Self::new(bounds, config.leaf_capacity)
    }

    /// The root coverage box.
    pub fn bounds(&self) -> BoundingBox {
        self.root.bounds
    }

    /// The configured leaf capacity.
    pub fn leaf_capacity(&self) -> usize {
        self.leaf_capacity
    }

    /// Number of records currently indexed.
    pub fn len(&self) -> usize {
        self.records
    }

    /// Whether the index holds no records.
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }

    /// Insert a record. Locations outside the root box are dropped with a
    /// warning and never grow the root. Re-inserting an existing ID at the
    /// same descent path overwrites its stored location; relocating across
    /// leaves requires an explicit delete of the old entry first.
    pub fn insert(&mut self, id: impl Into<String>, location: Location) {
        let id = id.into();
        if !self.root.bounds.contains(&location) {
            log::warn!(
                "dropping insert of {id:?}: ({}, {}) is outside the root box",
                location.latitude,
                location.longitude
            );
            return;
        }
        if self.root.insert(id, location, self.leaf_capacity) {
            self.records += 1;
        }
    }

    /// Delete a record by ID and the location it was inserted with. The
    /// location drives the descent, so an ID-only delete is not supported.
    /// Deleting an absent pair is a no-op; the returned flag is diagnostic
    /// only.
    pub fn delete(&mut self, id: &str, location: &Location) -> bool {
        if !self.root.bounds.contains(location) {
            return false;
        }
        let removed = self.root.delete(id, location);
        if removed {
            self.records -= 1;
        }
        removed
    }

    /// All records within `radius_km` of `center`, with exact haversine
    /// distances attached. The result set is unordered; callers sort.
    pub fn query(&self, center: &Location, radius_km: f64) -> Vec<QueryHit> {
        let mut hits = Vec::new();
        self.root.query(center, radius_km, &mut hits);
        hits
    }

    /// Structural counters for this tree.
    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::default();
        self.root.collect_stats(0, &mut stats);
        stats
    }
}
