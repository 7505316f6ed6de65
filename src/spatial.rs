//! Geodesic distance utilities leveraging the `geo` crate.
//!
//! Distances are great-circle (haversine) and reported in kilometers, which
//! is the unit the proximity API speaks everywhere.

use crate::types::Location;
use geo::{Distance, Haversine, Point};

/// Great-circle distance between two locations in kilometers.
///
/// Uses the haversine formula over a spherical Earth, which is fast and
/// accurate enough for proximity search. One degree of longitude at the
/// equator is about 111.19 km.
///
/// # Examples
///
/// ```
/// use proxima::{Location, spatial::haversine_km};
///
/// let origin = Location::new(0.0, 0.0);
/// let one_degree_east = Location::new(0.0, 1.0);
///
/// let d = haversine_km(&origin, &one_degree_east);
/// assert!((d - 111.19).abs() < 0.5);
/// ```
pub fn haversine_km(a: &Location, b: &Location) -> f64 {
    let from = Point::new(a.longitude, a.latitude);
    let to = Point::new(b.longitude, b.latitude);
    Haversine.distance(from, to) / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_degree_of_longitude_at_the_equator() {
        let d = haversine_km(&Location::new(0.0, 0.0), &Location::new(0.0, 1.0));
        assert!((d - 111.19).abs() < 0.5, "got {d}");
    }

    #[test]
    fn distance_is_symmetric() {
        let nyc = Location::new(40.7128, -74.0060);
        let london = Location::new(51.5074, -0.1278);
        let there = haversine_km(&nyc, &london);
        let back = haversine_km(&london, &nyc);
        assert!((there - back).abs() < 1e-9);
        // Transatlantic sanity: roughly 5,570 km.
        assert!(there > 5_300.0 && there < 5_800.0, "got {there}");
    }

    #[test]
    fn zero_distance_for_identical_points() {
        let p = Location::new(12.34, 56.78);
        assert_eq!(haversine_km(&p, &p), 0.0);
    }
}
