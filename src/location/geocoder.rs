//! External geocoding via Nominatim
//!
//! The geocoder is the last resolver tier and the only one that leaves the
//! process. Each lookup is a single time-bounded request for one result.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::LocationStrategy;
use crate::bounds::BoundsValidator;
use crate::config::{GeocoderConfig, RegionConfig};
use crate::models::{GeoPoint, ResolutionTier, ResolvedLocation};
use crate::{Result, SolarPalError};

const SERVICE: &str = "geocoder";

/// Best match returned by a geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub point: GeoPoint,
    pub display_name: String,
}

/// Text-to-point lookup restricted to one country
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Return the provider's first result, if any.
    async fn search(&self, query: &str, country_code: &str) -> Result<Option<GeocodeHit>>;
}

/// Nominatim place as returned by `/search?format=json`
#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    display_name: String,
}

impl NominatimPlace {
    fn into_hit(self) -> Result<GeocodeHit> {
        let latitude = self.lat.parse::<f64>().map_err(|_| {
            SolarPalError::upstream(SERVICE, format!("invalid latitude '{}'", self.lat))
        })?;
        let longitude = self.lon.parse::<f64>().map_err(|_| {
            SolarPalError::upstream(SERVICE, format!("invalid longitude '{}'", self.lon))
        })?;
        Ok(GeocodeHit {
            point: GeoPoint::new(latitude, longitude),
            display_name: self.display_name,
        })
    }
}

/// Geocoder backed by the Nominatim search API
pub struct NominatimClient {
    client: Client,
    base_url: String,
}

impl NominatimClient {
    pub fn new(config: &GeocoderConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| SolarPalError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, query: &str, country_code: &str) -> String {
        format!(
            "{}/search?q={}&format=json&countrycodes={}&limit=1",
            self.base_url,
            urlencoding::encode(query),
            urlencoding::encode(country_code)
        )
    }
}

#[async_trait]
impl Geocoder for NominatimClient {
    #[instrument(skip(self))]
    async fn search(&self, query: &str, country_code: &str) -> Result<Option<GeocodeHit>> {
        info!("Geocoding location: '{}'", query);
        let start_time = Instant::now();

        let url = self.search_url(query, country_code);
        debug!("Geocoder request URL: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("Geocoder request failed: {}", e);
            SolarPalError::from_transport(SERVICE, &e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Geocoder returned HTTP {}", status);
            return Err(SolarPalError::upstream(
                SERVICE,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| SolarPalError::from_transport(SERVICE, &e))?;

        let total_duration = start_time.elapsed();
        if total_duration.as_secs() > 5 {
            warn!(
                "Slow geocoder response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        match places.into_iter().next() {
            Some(place) => {
                let hit = place.into_hit()?;
                info!(
                    "Geocoded '{}' to {} in {:.3}s",
                    query,
                    hit.point.format_coordinates(),
                    total_duration.as_secs_f64()
                );
                Ok(Some(hit))
            }
            None => {
                warn!("No results found for location '{}'", query);
                Ok(None)
            }
        }
    }
}

/// Geocoder tier of the resolver: first provider result, kept only if it
/// falls inside the supported region.
pub struct GeocoderStrategy {
    geocoder: Arc<dyn Geocoder>,
    bounds: BoundsValidator,
    country_code: String,
}

impl GeocoderStrategy {
    pub fn new(geocoder: Arc<dyn Geocoder>, bounds: BoundsValidator, country_code: &str) -> Self {
        Self {
            geocoder,
            bounds,
            country_code: country_code.to_string(),
        }
    }

    pub fn from_config(geocoder: Arc<dyn Geocoder>, region: &RegionConfig) -> Self {
        Self::new(
            geocoder,
            BoundsValidator::from_config(region),
            &region.country_code,
        )
    }
}

#[async_trait]
impl LocationStrategy for GeocoderStrategy {
    fn name(&self) -> &'static str {
        "geocoder"
    }

    async fn attempt(&self, query: &str) -> Result<Option<ResolvedLocation>> {
        let Some(hit) = self.geocoder.search(query.trim(), &self.country_code).await? else {
            return Ok(None);
        };

        if !self.bounds.in_region(&hit.point) {
            warn!(
                "Geocoder result for '{}' at {} is outside the supported region",
                query,
                hit.point.format_coordinates()
            );
            return Ok(None);
        }

        Ok(Some(ResolvedLocation::new(
            hit.point,
            hit.display_name,
            ResolutionTier::Geocoder,
        )))
    }
}
