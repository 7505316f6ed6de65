//! Domain types and configuration for Proxima.
//!
//! These are the serializable records exchanged with the durable store and
//! the surrounding service, plus the crate configuration with sensible,
//! overridable defaults.

use crate::error::{ProximaError, Result};
use serde::{Deserialize, Serialize};

/// A geographic point in degrees.
///
/// Latitude is in [-90, 90], longitude in [-180, 180] by convention; the
/// index performs no range validation itself (points outside the configured
/// root box are silently dropped on insert).
///
/// # Examples
///
/// ```
/// use proxima::Location;
///
/// let nyc = Location::new(40.7128, -74.0060);
/// assert_eq!(nyc.latitude, 40.7128);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    /// Create a new location from latitude and longitude in degrees.
    #[inline]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// A canonical business record as held by the durable store.
///
/// `distance_km` is a query-result annotation only: it is populated when the
/// record is returned from a proximity search and is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub location: Location,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    #[serde(rename = "distance", skip_serializing_if = "Option::is_none", default)]
    pub distance_km: Option<f64>,
}

/// Attributes for a business that has not been assigned an ID yet.
///
/// The service assigns a UUID on creation; callers never pick IDs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBusiness {
    pub name: String,
    pub location: Location,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

impl NewBusiness {
    pub(crate) fn into_business(self, id: String) -> Business {
        Business {
            id,
            name: self.name,
            location: self.location,
            phone: self.phone,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            distance_km: None,
        }
    }
}

/// A proximity search request: a center point and a radius in kilometers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NearbySearchRequest {
    #[serde(rename = "location")]
    pub center: Location,
    #[serde(rename = "radius")]
    pub radius_km: f64,
}

/// Index configuration: the root coverage box and the leaf capacity.
///
/// Defaults cover the whole world with a leaf capacity of 3. Loadable from
/// JSON, or from TOML with the `toml` feature enabled.
///
/// # Examples
///
/// ```
/// use proxima::Config;
///
/// let config = Config::default();
/// assert_eq!(config.leaf_capacity, 3);
///
/// let json = r#"{ "leaf_capacity": 8 }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.leaf_capacity, 8);
/// assert_eq!(config.root_origin_lat, -90.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Southern edge of the root box, degrees latitude.
    #[serde(default = "Config::default_root_origin_lat")]
    pub root_origin_lat: f64,

    /// Western edge of the root box, degrees longitude.
    #[serde(default = "Config::default_root_origin_lon")]
    pub root_origin_lon: f64,

    /// Latitude span of the root box, degrees. Must be > 0.
    #[serde(default = "Config::default_root_lat_extent")]
    pub root_lat_extent: f64,

    /// Longitude span of the root box, degrees. Must be > 0.
    #[serde(default = "Config::default_root_lon_extent")]
    pub root_lon_extent: f64,

    /// Records a leaf may hold before it subdivides. Must be >= 1.
    #[serde(default = "Config::default_leaf_capacity")]
    pub leaf_capacity: usize,
}

impl Config {
    fn default_root_origin_lat() -> f64 {
        -90.0
    }

    fn default_root_origin_lon() -> f64 {
        -180.0
    }

    fn default_root_lat_extent() -> f64 {
        180.0
    }

    fn default_root_lon_extent() -> f64 {
        360.0
    }

    fn default_leaf_capacity() -> usize {
        3
    }

    /// Validate invariants that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        if self.root_lat_extent <= 0.0 || self.root_lon_extent <= 0.0 {
            return Err(ProximaError::Config(format!(
                "root box extents must be positive (got lat {}, lon {})",
                self.root_lat_extent, self.root_lon_extent
            )));
        }
        if self.leaf_capacity == 0 {
            return Err(ProximaError::Config(
                "leaf_capacity must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from a TOML string.
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(toml_str).map_err(|e| ProximaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_origin_lat: Self::default_root_origin_lat(),
            root_origin_lon: Self::default_root_origin_lon(),
            root_lat_extent: Self::default_root_lat_extent(),
            root_lon_extent: Self::default_root_lon_extent(),
            leaf_capacity: Self::default_leaf_capacity(),
        }
    }
}
