//! `SolarPal` - Solar potential assessment for locations in the Philippines
//!
//! This library resolves a location query into a point, fetches its recent
//! daily irradiance, scores it and places it among predefined solar zones.

pub mod api;
pub mod bounds;
pub mod config;
pub mod error;
pub mod irradiance;
pub mod location;
pub mod location_resolver;
pub mod logging;
pub mod models;
pub mod scoring;
pub mod service;
pub mod web;
pub mod zones;

// Re-export core types for public API
pub use bounds::BoundsValidator;
pub use config::SolarPalConfig;
pub use error::{ErrorCode, SolarPalError};
pub use irradiance::{IrradianceFetcher, IrradianceProvider, NasaPowerClient};
pub use location::{Geocoder, LocationStrategy, NominatimClient};
pub use location_resolver::LocationResolver;
pub use models::{
    GeoPoint, IrradianceSeries, LocationQuery, Rating, ResolvedLocation, SolarAssessment,
};
pub use scoring::ScoreEngine;
pub use service::{AssessmentService, SiteReport};
pub use zones::{SolarZone, ZoneClassifier, ZoneType};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SolarPalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
