//! Literal "lat,lon" parsing

use async_trait::async_trait;
use tracing::debug;

use super::{LocationStrategy, describe_point};
use crate::bounds::BoundsValidator;
use crate::models::{GeoPoint, ResolutionTier, ResolvedLocation};
use crate::{Result, SolarPalError};

/// Coordinate tier of the resolver.
///
/// Text whose comma-separated parts all read as numbers is owned by this
/// tier: it either resolves here or fails here, and never reaches the
/// geocoder.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateParser {
    sanity: BoundsValidator,
}

impl CoordinateParser {
    /// Loose range accepted for typed coordinates, 5–21°N and 117–127°E
    pub const SANITY_RANGE: BoundsValidator = BoundsValidator::new(5.0, 21.0, 117.0, 127.0);

    #[must_use]
    pub fn new(sanity: BoundsValidator) -> Self {
        Self { sanity }
    }

    /// Parse a literal coordinate pair.
    ///
    /// Returns `Ok(None)` when the input is not shaped like a pair at all.
    pub fn parse(&self, input: &str) -> Result<Option<GeoPoint>> {
        let parts: Vec<&str> = input.trim().split(',').map(str::trim).collect();
        if parts.len() < 2 || !parts.iter().all(|part| is_number_like(part)) {
            return Ok(None);
        }

        if parts.len() != 2 {
            return Err(SolarPalError::validation(
                "Coordinates must be in format 'lat,lon'",
            ));
        }

        let latitude = parse_component("latitude", parts[0])?;
        let longitude = parse_component("longitude", parts[1])?;
        let point = GeoPoint::new(latitude, longitude);

        if !self.sanity.in_region(&point) {
            return Err(SolarPalError::out_of_bounds(format!(
                "Coordinates {}, {} are outside the supported range ({}°-{}°N, {}°-{}°E)",
                latitude,
                longitude,
                self.sanity.south,
                self.sanity.north,
                self.sanity.west,
                self.sanity.east
            )));
        }

        Ok(Some(point))
    }
}

impl Default for CoordinateParser {
    fn default() -> Self {
        Self::new(Self::SANITY_RANGE)
    }
}

/// Anything `f64` accepts (exponents, `nan`, `inf`) or a digit string
/// with stray separators such as `14.6.042`.
fn is_number_like(part: &str) -> bool {
    part.parse::<f64>().is_ok() || looks_numeric(part)
}

fn looks_numeric(part: &str) -> bool {
    !part.is_empty()
        && part.chars().any(|c| c.is_ascii_digit())
        && part
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
}

fn parse_component(label: &str, raw: &str) -> Result<f64> {
    let value = raw
        .parse::<f64>()
        .map_err(|_| SolarPalError::validation(format!("Invalid {label}: '{raw}'")))?;

    if !value.is_finite() {
        return Err(SolarPalError::validation(format!(
            "Invalid {label}: '{raw}' is not a finite number"
        )));
    }

    Ok(value)
}

#[async_trait]
impl LocationStrategy for CoordinateParser {
    fn name(&self) -> &'static str {
        "coordinates"
    }

    async fn attempt(&self, query: &str) -> Result<Option<ResolvedLocation>> {
        let Some(point) = self.parse(query)? else {
            return Ok(None);
        };
        debug!("Parsed literal coordinates: {}", point.format_coordinates());
        Ok(Some(ResolvedLocation::new(
            point,
            describe_point(&point),
            ResolutionTier::Coordinates,
        )))
    }
}
