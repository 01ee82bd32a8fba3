//! Data models for `SolarPal`
//!
//! This module contains the core domain models organized by concern:
//! - Location: points, queries and resolved locations
//! - Irradiance: daily samples and series
//! - Assessment: scores, ratings and production estimates

pub mod assessment;
pub mod irradiance;
pub mod location;

// Re-export all public types for convenient access
pub use assessment::{Rating, SolarAssessment};
pub use irradiance::{IrradianceSample, IrradianceSeries};
pub use location::{GeoPoint, LocationQuery, ResolutionTier, ResolvedLocation};
