use tracing::{debug, info};

use super::{SolarZone, ZoneCollection, ZoneStatistics, ZoneType};
use crate::Result;
use crate::models::GeoPoint;

const BUILTIN_ZONES: &str = include_str!("data/solar_zones.json");

/// Point lookup over an immutable zone table
#[derive(Debug, Clone)]
pub struct ZoneClassifier {
    collection: ZoneCollection,
}

impl ZoneClassifier {
    pub fn new(collection: ZoneCollection) -> Self {
        Self { collection }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        ZoneCollection::from_json(json).map(Self::new)
    }

    /// The Philippine zone table compiled into the binary
    pub fn builtin() -> Result<Self> {
        let classifier = Self::from_json(BUILTIN_ZONES)?;
        info!(
            "Loaded {} solar zones",
            classifier.statistics().total_zones
        );
        Ok(classifier)
    }

    /// Enclosing zone of a point. Overlaps resolve to the first zone in
    /// dataset order.
    #[must_use]
    pub fn classify(&self, point: &GeoPoint) -> Option<&SolarZone> {
        let zone = self.zones().iter().find(|zone| zone.contains(point));
        debug!(
            "Point {} classified as {:?}",
            point.format_coordinates(),
            zone.map(|z| z.id.as_str())
        );
        zone
    }

    /// Zone whose center is closest, with the distance in km
    #[must_use]
    pub fn nearest(&self, point: &GeoPoint) -> Option<(&SolarZone, f64)> {
        self.zones()
            .iter()
            .map(|zone| (zone, distance_km(point, &zone.center)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }

    #[must_use]
    pub fn zones(&self) -> &[SolarZone] {
        self.collection.zones()
    }

    pub fn zones_of_type(&self, zone_type: ZoneType) -> impl Iterator<Item = &SolarZone> {
        self.zones()
            .iter()
            .filter(move |zone| zone.zone_type == zone_type)
    }

    #[must_use]
    pub fn statistics(&self) -> &ZoneStatistics {
        self.collection.statistics()
    }
}

fn distance_km(from: &GeoPoint, to: &GeoPoint) -> f64 {
    haversine::distance(
        haversine::Location {
            latitude: from.latitude,
            longitude: from.longitude,
        },
        haversine::Location {
            latitude: to.latitude,
            longitude: to.longitude,
        },
        haversine::Units::Kilometers,
    )
}
