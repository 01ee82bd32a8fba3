//! Location model for geographic coordinates and queries

use serde::{Deserialize, Serialize};

/// A point in WGS84 decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl GeoPoint {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Format location as coordinates string
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// What the caller asked for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free text: a place name or a literal "lat,lon" pair
    Text(String),
    /// An explicit coordinate pair
    Coordinates(GeoPoint),
    /// A point picked on the map
    MapClick(GeoPoint),
}

impl LocationQuery {
    pub fn text<S: Into<String>>(text: S) -> Self {
        Self::Text(text.into())
    }
}

/// Which step of the resolution produced a location
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionTier {
    Gazetteer,
    Coordinates,
    Geocoder,
    /// The caller supplied the point directly
    Direct,
}

/// A validated point together with its display name
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub point: GeoPoint,
    pub display_name: String,
    pub tier: ResolutionTier,
}

impl ResolvedLocation {
    pub fn new<S: Into<String>>(point: GeoPoint, display_name: S, tier: ResolutionTier) -> Self {
        Self {
            point,
            display_name: display_name.into(),
            tier,
        }
    }
}
