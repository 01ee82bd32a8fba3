//! Predefined solar zones
//!
//! A fixed table of regional polygons, each tagged with a static solar
//! classification. The table is parsed once from embedded JSON and shared
//! read-only by [`ZoneClassifier`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use crate::models::{GeoPoint, Rating};
use crate::{Result, SolarPalError};

pub mod classifier;
mod polygon;

pub use classifier::ZoneClassifier;

/// Static classification of a zone
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum ZoneType {
    Excellent,
    Good,
    Fair,
    Low,
}

impl ZoneType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneType::Excellent => "excellent",
            ZoneType::Good => "good",
            ZoneType::Fair => "fair",
            ZoneType::Low => "low",
        }
    }

    /// Assessment rating with the same name
    #[must_use]
    pub fn rating(&self) -> Rating {
        match self {
            ZoneType::Excellent => Rating::Excellent,
            ZoneType::Good => Rating::Good,
            ZoneType::Fair => Rating::Fair,
            ZoneType::Low => Rating::Low,
        }
    }
}

impl fmt::Display for ZoneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A region polygon with its solar classification
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SolarZone {
    pub id: String,
    pub name: String,
    pub region: String,
    #[serde(rename = "type")]
    pub zone_type: ZoneType,
    pub score: u8,
    /// Ordered ring, implicitly closed
    pub boundary: Vec<GeoPoint>,
    pub center: GeoPoint,
}

impl SolarZone {
    /// Even-odd test against the boundary ring
    #[must_use]
    pub fn contains(&self, point: &GeoPoint) -> bool {
        polygon::contains(&self.boundary, point)
    }
}

/// Zone record as stored in the dataset, points as `[lat, lon]`
#[derive(Debug, Deserialize)]
struct ZoneRecord {
    id: String,
    name: String,
    region: String,
    #[serde(rename = "type")]
    zone_type: ZoneType,
    score: u8,
    boundary: Vec<[f64; 2]>,
    center: [f64; 2],
}

impl From<ZoneRecord> for SolarZone {
    fn from(record: ZoneRecord) -> Self {
        let point = |[lat, lon]: [f64; 2]| GeoPoint::new(lat, lon);
        Self {
            id: record.id,
            name: record.name,
            region: record.region,
            zone_type: record.zone_type,
            score: record.score,
            boundary: record.boundary.into_iter().map(point).collect(),
            center: point(record.center),
        }
    }
}

/// Aggregates over the whole zone table
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ZoneStatistics {
    pub total_zones: usize,
    pub average_score: f64,
    pub min_score: u8,
    pub max_score: u8,
    pub by_type: BTreeMap<ZoneType, usize>,
}

impl ZoneStatistics {
    fn compute(zones: &[SolarZone]) -> Self {
        let mut by_type = BTreeMap::new();
        for zone in zones {
            *by_type.entry(zone.zone_type).or_insert(0) += 1;
        }

        let total: u32 = zones.iter().map(|z| u32::from(z.score)).sum();
        let average_score = if zones.is_empty() {
            0.0
        } else {
            f64::from(total) / zones.len() as f64
        };

        Self {
            total_zones: zones.len(),
            average_score,
            min_score: zones.iter().map(|z| z.score).min().unwrap_or(0),
            max_score: zones.iter().map(|z| z.score).max().unwrap_or(0),
            by_type,
        }
    }
}

/// All zones in dataset order plus their statistics
#[derive(Debug, Clone)]
pub struct ZoneCollection {
    zones: Vec<SolarZone>,
    statistics: ZoneStatistics,
}

impl ZoneCollection {
    /// Parse and validate a JSON array of zone records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<ZoneRecord> = serde_json::from_str(json)
            .map_err(|e| SolarPalError::config(format!("Invalid zone dataset: {e}")))?;
        Self::new(records.into_iter().map(SolarZone::from).collect())
    }

    pub fn new(zones: Vec<SolarZone>) -> Result<Self> {
        validate_zones(&zones)?;
        let statistics = ZoneStatistics::compute(&zones);
        Ok(Self { zones, statistics })
    }

    #[must_use]
    pub fn zones(&self) -> &[SolarZone] {
        &self.zones
    }

    #[must_use]
    pub fn statistics(&self) -> &ZoneStatistics {
        &self.statistics
    }
}

fn validate_zones(zones: &[SolarZone]) -> Result<()> {
    let mut seen = HashSet::new();
    for zone in zones {
        if !seen.insert(zone.id.as_str()) {
            return Err(SolarPalError::config(format!(
                "Duplicate zone id '{}'",
                zone.id
            )));
        }
        if zone.boundary.len() < 3 {
            return Err(SolarPalError::config(format!(
                "Zone '{}' boundary needs at least 3 points, got {}",
                zone.id,
                zone.boundary.len()
            )));
        }
        if zone.score > 100 {
            return Err(SolarPalError::config(format!(
                "Zone '{}' score {} is above 100",
                zone.id, zone.score
            )));
        }
        if !zone.center.is_finite() || zone.boundary.iter().any(|p| !p.is_finite()) {
            return Err(SolarPalError::config(format!(
                "Zone '{}' has non-finite coordinates",
                zone.id
            )));
        }
    }
    Ok(())
}
