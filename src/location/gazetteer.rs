//! Fixed table of well-known Philippine places

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

use super::LocationStrategy;
use crate::Result;
use crate::models::{GeoPoint, ResolutionTier, ResolvedLocation};

struct Place {
    name: &'static str,
    aliases: &'static [&'static str],
    latitude: f64,
    longitude: f64,
}

const fn place(
    name: &'static str,
    aliases: &'static [&'static str],
    latitude: f64,
    longitude: f64,
) -> Place {
    Place {
        name,
        aliases,
        latitude,
        longitude,
    }
}

const PLACES: &[Place] = &[
    // Metro Manila
    place("Manila", &["City of Manila"], 14.5995, 120.9842),
    place("Quezon City", &["QC"], 14.6760, 121.0437),
    place("Makati", &["Makati City"], 14.5547, 121.0244),
    place("Pasig", &["Pasig City"], 14.5764, 121.0851),
    place("Taguig", &["Taguig City", "BGC"], 14.5176, 121.0509),
    place("Caloocan", &["Caloocan City"], 14.6507, 120.9676),
    place("Pasay", &["Pasay City"], 14.5378, 121.0014),
    place("Parañaque", &["Paranaque", "Parañaque City"], 14.4793, 121.0198),
    place("Mandaluyong", &["Mandaluyong City"], 14.5794, 121.0359),
    place("Marikina", &["Marikina City"], 14.6507, 121.1029),
    place("Muntinlupa", &["Muntinlupa City"], 14.4081, 121.0415),
    place("Las Piñas", &["Las Pinas"], 14.4445, 120.9939),
    place("Valenzuela", &["Valenzuela City"], 14.7011, 120.9830),
    // Luzon
    place("Baguio", &["Baguio City"], 16.4023, 120.5960),
    place("Angeles", &["Angeles City"], 15.1450, 120.5887),
    place("Olongapo", &["Olongapo City"], 14.8386, 120.2842),
    place("Batangas City", &["Batangas"], 13.7565, 121.0583),
    place("Lucena", &["Lucena City"], 13.9373, 121.6170),
    place("Tagaytay", &["Tagaytay City"], 14.1153, 120.9621),
    place("Antipolo", &["Antipolo City"], 14.5864, 121.1760),
    place("Tuguegarao", &["Tuguegarao City"], 17.6132, 121.7270),
    place("Cabanatuan", &["Cabanatuan City"], 15.4865, 120.9667),
    place("Dagupan", &["Dagupan City"], 16.0433, 120.3333),
    place("Laoag", &["Laoag City"], 18.1960, 120.5927),
    place("Vigan", &["Vigan City"], 17.5747, 120.3869),
    place("Basco", &["Batanes"], 20.4487, 121.9702),
    place("Legazpi", &["Legazpi City", "Legaspi"], 13.1391, 123.7438),
    place("Naga", &["Naga City"], 13.6218, 123.1948),
    place("Puerto Princesa", &["Puerto Princesa City", "Palawan"], 9.7392, 118.7353),
    place("El Nido", &[], 11.1956, 119.4075),
    place("Coron", &[], 12.0046, 120.2036),
    // Visayas
    place("Cebu City", &["Cebu"], 10.3157, 123.8854),
    place("Mandaue", &["Mandaue City"], 10.3236, 123.9223),
    place("Lapu-Lapu", &["Lapu-Lapu City", "Mactan"], 10.3103, 123.9494),
    place("Iloilo City", &["Iloilo"], 10.7202, 122.5621),
    place("Bacolod", &["Bacolod City"], 10.6765, 122.9509),
    place("Tacloban", &["Tacloban City"], 11.2543, 125.0000),
    place("Ormoc", &["Ormoc City"], 11.0064, 124.6075),
    place("Calbayog", &["Calbayog City"], 12.0672, 124.5969),
    place("Dumaguete", &["Dumaguete City"], 9.3068, 123.3054),
    place("Tagbilaran", &["Tagbilaran City", "Bohol"], 9.6475, 123.8556),
    place("Roxas City", &["Roxas"], 11.5853, 122.7511),
    place("Boracay", &[], 11.9674, 121.9248),
    // Mindanao
    place("Davao City", &["Davao"], 7.1907, 125.4553),
    place("Cagayan de Oro", &["CDO", "Cagayan de Oro City"], 8.4542, 124.6319),
    place("Zamboanga City", &["Zamboanga"], 6.9214, 122.0790),
    place("General Santos", &["GenSan", "General Santos City"], 6.1164, 125.1716),
    place("Iligan", &["Iligan City"], 8.2280, 124.2452),
    place("Butuan", &["Butuan City"], 8.9475, 125.5406),
    place("Surigao City", &["Surigao"], 9.7838, 125.4888),
    place("Cotabato City", &["Cotabato"], 7.2236, 124.2464),
    place("Koronadal", &["Koronadal City", "Marbel"], 6.5008, 124.8469),
    place("Marawi", &["Marawi City"], 8.0034, 124.2839),
    place("Jolo", &[], 6.0535, 121.0020),
    place("Siargao", &["General Luna"], 9.7846, 126.1580),
];

static INDEX: LazyLock<HashMap<String, &'static Place>> = LazyLock::new(|| {
    let mut index = HashMap::with_capacity(PLACES.len() * 2);
    for entry in PLACES {
        index.insert(normalize(entry.name), entry);
        for alias in entry.aliases {
            index.insert(normalize(alias), entry);
        }
    }
    index
});

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Gazetteer resolution tier: exact, case-insensitive name match
#[derive(Debug, Default, Clone, Copy)]
pub struct Gazetteer;

impl Gazetteer {
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<ResolvedLocation> {
        INDEX.get(&normalize(name)).map(|entry| {
            ResolvedLocation::new(
                GeoPoint::new(entry.latitude, entry.longitude),
                entry.name,
                ResolutionTier::Gazetteer,
            )
        })
    }

    /// Number of distinct places (aliases not counted)
    #[must_use]
    pub fn len(&self) -> usize {
        PLACES.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        PLACES.is_empty()
    }
}

#[async_trait]
impl LocationStrategy for Gazetteer {
    fn name(&self) -> &'static str {
        "gazetteer"
    }

    async fn attempt(&self, query: &str) -> Result<Option<ResolvedLocation>> {
        let hit = self.lookup(query);
        if let Some(location) = &hit {
            debug!("Gazetteer hit for '{}': {}", query, location.display_name);
        }
        Ok(hit)
    }
}

/// Coarse name for a bare point, used when the caller supplied coordinates.
#[must_use]
pub fn describe_point(point: &GeoPoint) -> String {
    let (lat, lon) = (point.latitude, point.longitude);
    if (14.5..=14.8).contains(&lat) && (120.9..=121.1).contains(&lon) {
        "Metro Manila".to_string()
    } else if (10.2..=10.4).contains(&lat) && (123.8..=124.0).contains(&lon) {
        "Cebu City".to_string()
    } else if (7.0..=7.2).contains(&lat) && (125.5..=125.7).contains(&lon) {
        "Davao City".to_string()
    } else if (16.3..=16.5).contains(&lat) && (120.5..=120.7).contains(&lon) {
        "Baguio City".to_string()
    } else {
        format!("Philippines ({lat:.2}, {lon:.2})")
    }
}
