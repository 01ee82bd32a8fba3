//! Region containment checks

use crate::config::RegionConfig;
use crate::models::GeoPoint;
use crate::{Result, SolarPalError};

/// Inclusive latitude/longitude rectangle of the supported region
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsValidator {
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundsValidator {
    /// The Philippines, 4.5–21.5°N and 116–127°E
    pub const PHILIPPINES: Self = Self::new(4.5, 21.5, 116.0, 127.0);

    #[must_use]
    pub const fn new(south: f64, north: f64, west: f64, east: f64) -> Self {
        Self {
            south,
            north,
            west,
            east,
        }
    }

    #[must_use]
    pub fn from_config(region: &RegionConfig) -> Self {
        Self::new(region.south, region.north, region.west, region.east)
    }

    /// True when the point lies inside the rectangle, edges included.
    /// Non-finite coordinates are never in the region.
    #[must_use]
    pub fn in_region(&self, point: &GeoPoint) -> bool {
        (self.south..=self.north).contains(&point.latitude)
            && (self.west..=self.east).contains(&point.longitude)
    }

    /// Like [`in_region`](Self::in_region) but reports which axis failed.
    pub fn check(&self, point: &GeoPoint) -> Result<()> {
        if !point.is_finite() {
            return Err(SolarPalError::validation(
                "Coordinates must be finite numbers",
            ));
        }

        if !(self.south..=self.north).contains(&point.latitude) {
            return Err(SolarPalError::out_of_bounds(format!(
                "Latitude must be within supported range ({}°-{}°N), got {}",
                self.south, self.north, point.latitude
            )));
        }

        if !(self.west..=self.east).contains(&point.longitude) {
            return Err(SolarPalError::out_of_bounds(format!(
                "Longitude must be within supported range ({}°-{}°E), got {}",
                self.west, self.east, point.longitude
            )));
        }

        Ok(())
    }
}

impl Default for BoundsValidator {
    fn default() -> Self {
        Self::PHILIPPINES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(4.5, 116.0, true)]
    #[case(21.5, 127.0, true)]
    #[case(4.5, 127.0, true)]
    #[case(21.5, 116.0, true)]
    #[case(14.5995, 120.9842, true)]
    #[case(4.499_999, 120.0, false)]
    #[case(21.500_001, 120.0, false)]
    #[case(14.0, 115.999_999, false)]
    #[case(14.0, 127.000_001, false)]
    #[case(35.6762, 139.6503, false)]
    #[case(-14.5, -120.9, false)]
    fn test_in_region(#[case] lat: f64, #[case] lon: f64, #[case] expected: bool) {
        let validator = BoundsValidator::default();
        assert_eq!(validator.in_region(&GeoPoint::new(lat, lon)), expected);
    }

    #[test]
    fn test_non_finite_points_are_rejected() {
        let validator = BoundsValidator::default();
        assert!(!validator.in_region(&GeoPoint::new(f64::NAN, 120.0)));
        assert!(!validator.in_region(&GeoPoint::new(14.0, f64::INFINITY)));
        assert!(matches!(
            validator.check(&GeoPoint::new(f64::NAN, 120.0)),
            Err(SolarPalError::Validation { .. })
        ));
    }

    #[test]
    fn test_check_reports_failing_axis() {
        let validator = BoundsValidator::default();
        let err = validator.check(&GeoPoint::new(30.0, 120.0)).unwrap_err();
        assert!(matches!(err, SolarPalError::OutOfBounds { .. }));
        assert!(err.to_string().contains("Latitude"));

        let err = validator.check(&GeoPoint::new(10.0, 130.0)).unwrap_err();
        assert!(err.to_string().contains("Longitude"));

        assert!(validator.check(&GeoPoint::new(10.0, 123.0)).is_ok());
    }

    #[test]
    fn test_from_config_matches_default_region() {
        let validator = BoundsValidator::from_config(&RegionConfig::default());
        assert_eq!(validator, BoundsValidator::PHILIPPINES);
    }
}
