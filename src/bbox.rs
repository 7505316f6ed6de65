//! Axis-aligned bounding boxes over the latitude/longitude plane.

use crate::error::{ProximaError, Result};
use crate::spatial::haversine_km;
use crate::types::Location;
use serde::{Deserialize, Serialize};

/// An axis-aligned box covering latitude `[origin_lat, origin_lat + lat_extent)`
/// and longitude `[origin_lon, origin_lon + lon_extent)`.
///
/// Both axes are half-open: a point exactly on the upper edge belongs to the
/// neighboring box, never to both. Extents are always positive for a valid
/// box.
///
/// # Examples
///
/// ```
/// use proxima::{BoundingBox, Location};
///
/// let bbox = BoundingBox::new(-90.0, -180.0, 180.0, 360.0).unwrap();
/// assert!(bbox.contains(&Location::new(0.0, 0.0)));
/// assert!(!bbox.contains(&Location::new(90.0, 0.0))); // upper edge excluded
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Southern edge, degrees latitude.
    pub origin_lat: f64,
    /// Western edge, degrees longitude.
    pub origin_lon: f64,
    /// Latitude span, degrees.
    pub lat_extent: f64,
    /// Longitude span, degrees.
    pub lon_extent: f64,
}

impl BoundingBox {
    /// Create a new bounding box.
    ///
    /// # Errors
    ///
    /// Returns `ProximaError::InvalidInput` if either extent is not positive.
    pub fn new(origin_lat: f64, origin_lon: f64, lat_extent: f64, lon_extent: f64) -> Result<Self> {
        if lat_extent <= 0.0 || lon_extent <= 0.0 {
            return Err(ProximaError::InvalidInput(format!(
                "bounding box extents must be positive (got lat {lat_extent}, lon {lon_extent})"
            )));
        }
        Ok(Self {
            origin_lat,
            origin_lon,
            lat_extent,
            lon_extent,
        })
    }

    /// The box covering the whole world: latitude [-90, 90), longitude [-180, 180).
    pub fn world() -> Self {
        Self {
            origin_lat: -90.0,
            origin_lon: -180.0,
            lat_extent: 180.0,
            lon_extent: 360.0,
        }
    }

    /// Half-open containment test on both axes.
    #[inline]
    pub fn contains(&self, location: &Location) -> bool {
        location.latitude >= self.origin_lat
            && location.latitude < self.origin_lat + self.lat_extent
            && location.longitude >= self.origin_lon
            && location.longitude < self.origin_lon + self.lon_extent
    }

    /// Split into four quadrants that exactly tile this box.
    ///
    /// Each axis is halved; the upper quadrants absorb any floating-point
    /// remainder so the children leave no gap and never overlap. Order is
    /// south-west, south-east, north-west, north-east.
    pub fn quadrants(&self) -> [BoundingBox; 4] {
        let half_lat = self.lat_extent / 2.0;
        let half_lon = self.lon_extent / 2.0;
        let upper_lat = self.lat_extent - half_lat;
        let upper_lon = self.lon_extent - half_lon;
        let mid_lat = self.origin_lat + half_lat;
        let mid_lon = self.origin_lon + half_lon;

        [
            BoundingBox {
                origin_lat: self.origin_lat,
                origin_lon: self.origin_lon,
                lat_extent: half_lat,
                lon_extent: half_lon,
            },
            BoundingBox {
                origin_lat: self.origin_lat,
                origin_lon: mid_lon,
                lat_extent: half_lat,
                lon_extent: upper_lon,
            },
            BoundingBox {
                origin_lat: mid_lat,
                origin_lon: self.origin_lon,
                lat_extent: upper_lat,
                lon_extent: half_lon,
            },
            BoundingBox {
                origin_lat: mid_lat,
                origin_lon: mid_lon,
                lat_extent: upper_lat,
                lon_extent: upper_lon,
            },
        ]
    }

    /// Whether halving still produces four strictly smaller quadrants.
    ///
    /// Near float resolution the midpoint of an axis rounds onto the box
    /// edge and a split stops making progress; such a box must not
    /// subdivide further.
    pub(crate) fn splittable(&self) -> bool {
        let mid_lat = self.origin_lat + self.lat_extent / 2.0;
        let mid_lon = self.origin_lon + self.lon_extent / 2.0;
        mid_lat > self.origin_lat
            && mid_lat < self.origin_lat + self.lat_extent
            && mid_lon > self.origin_lon
            && mid_lon < self.origin_lon + self.lon_extent
    }

    /// The point inside this box closest to `center`, by clamping each axis.
    pub fn closest_point(&self, center: &Location) -> Location {
        Location {
            latitude: center
                .latitude
                .clamp(self.origin_lat, self.origin_lat + self.lat_extent),
            longitude: center
                .longitude
                .clamp(self.origin_lon, self.origin_lon + self.lon_extent),
        }
    }

    /// Whether the search circle around `center` can reach into this box.
    ///
    /// Clamps the center into the box and checks the haversine distance to
    /// that closest point. Over-approximates (a box may pass yet hold no
    /// matching records) but never misses a box that contains a match, which
    /// makes it a sound pruning predicate for query descent.
    pub fn intersects_circle(&self, center: &Location, radius_km: f64) -> bool {
        haversine_km(center, &self.closest_point(center)) <= radius_km
    }
}
