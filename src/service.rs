//! End-to-end site assessment
//!
//! Resolve, fetch, score and classify, strictly in that order. The first
//! failing step ends the request.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, instrument, warn};

use crate::Result;
use crate::config::SolarPalConfig;
use crate::irradiance::{IrradianceFetcher, IrradianceProvider, NasaPowerClient};
use crate::location::{Geocoder, NominatimClient};
use crate::location_resolver::LocationResolver;
use crate::models::{LocationQuery, ResolvedLocation, SolarAssessment};
use crate::scoring::ScoreEngine;
use crate::zones::{SolarZone, ZoneClassifier};

/// Assessment plus the predefined zone the site falls in
#[derive(Debug, Serialize, Clone)]
pub struct SiteReport {
    #[serde(flatten)]
    pub assessment: SolarAssessment,
    pub zone: Option<SolarZone>,
}

pub struct AssessmentService {
    resolver: LocationResolver,
    fetcher: IrradianceFetcher,
    engine: ScoreEngine,
    zones: Arc<ZoneClassifier>,
}

impl AssessmentService {
    pub fn new(
        resolver: LocationResolver,
        fetcher: IrradianceFetcher,
        engine: ScoreEngine,
        zones: Arc<ZoneClassifier>,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            engine,
            zones,
        }
    }

    /// Wire the pipeline from configuration with explicit providers
    pub fn with_providers(
        config: &SolarPalConfig,
        geocoder: Arc<dyn Geocoder>,
        provider: Arc<dyn IrradianceProvider>,
        zones: Arc<ZoneClassifier>,
    ) -> Self {
        Self::new(
            LocationResolver::standard(&config.region, geocoder),
            IrradianceFetcher::new(provider, config.irradiance.window_days),
            ScoreEngine::from_config(&config.scoring),
            zones,
        )
    }

    /// Wire the pipeline against the live Nominatim and NASA POWER services
    pub fn from_config(config: &SolarPalConfig, zones: Arc<ZoneClassifier>) -> Result<Self> {
        let geocoder = Arc::new(NominatimClient::new(&config.geocoder)?);
        let provider = Arc::new(NasaPowerClient::new(&config.irradiance)?);
        Ok(Self::with_providers(config, geocoder, provider, zones))
    }

    #[must_use]
    pub fn zones(&self) -> &Arc<ZoneClassifier> {
        &self.zones
    }

    pub async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedLocation> {
        self.resolver.resolve(query).await
    }

    #[instrument(skip(self))]
    pub async fn assess(&self, query: &LocationQuery) -> Result<SiteReport> {
        let start_time = Instant::now();

        let report = self.run(query).await.inspect_err(|e| {
            if e.is_upstream() {
                error!("Assessment failed upstream: {}", e);
            } else {
                warn!("Assessment rejected: {}", e);
            }
        })?;

        info!(
            "Assessed {} in {:.3}s: score {} ({})",
            report.assessment.location,
            start_time.elapsed().as_secs_f64(),
            report.assessment.solar_score,
            report.assessment.rating
        );

        Ok(report)
    }

    async fn run(&self, query: &LocationQuery) -> Result<SiteReport> {
        let location = self.resolver.resolve(query).await?;
        let series = self.fetcher.fetch(&location.point).await?;
        let assessment = self.engine.score(&location, &series)?;
        let zone = self.zones.classify(&location.point).cloned();

        Ok(SiteReport { assessment, zone })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SolarPalError;
    use crate::location::GeocodeHit;
    use crate::models::{GeoPoint, IrradianceSample, Rating, ResolutionTier};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeGeocoder {
        hit: Option<GeocodeHit>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for FakeGeocoder {
        async fn search(&self, _query: &str, _country_code: &str) -> Result<Option<GeocodeHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hit.clone())
        }
    }

    enum Reply {
        Constant(f64),
        Empty,
        Timeout,
    }

    struct FakeProvider {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl FakeProvider {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl IrradianceProvider for FakeProvider {
        fn name(&self) -> &'static str {
            "fake"
        }

        async fn daily_irradiance(
            &self,
            _point: &GeoPoint,
            start: NaiveDate,
            _end: NaiveDate,
        ) -> Result<Vec<IrradianceSample>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Constant(value) => Ok((0..30)
                    .map(|i| IrradianceSample {
                        date: start + chrono::Duration::days(i),
                        value,
                    })
                    .collect()),
                Reply::Empty => Ok(Vec::new()),
                Reply::Timeout => Err(SolarPalError::upstream_timeout("fake", "timed out")),
            }
        }
    }

    fn service(
        geocoder: Arc<FakeGeocoder>,
        provider: Arc<FakeProvider>,
    ) -> AssessmentService {
        AssessmentService::with_providers(
            &SolarPalConfig::default(),
            geocoder,
            provider,
            Arc::new(ZoneClassifier::builtin().unwrap()),
        )
    }

    #[tokio::test]
    async fn test_assess_named_place() {
        let geocoder = Arc::new(FakeGeocoder::default());
        let provider = Arc::new(FakeProvider::new(Reply::Constant(5.6)));
        let service = service(geocoder.clone(), provider.clone());

        let report = service.assess(&LocationQuery::text("Manila")).await.unwrap();

        assert_eq!(report.assessment.location, "Manila");
        assert_eq!(report.assessment.solar_score, 88);
        assert_eq!(report.assessment.rating, Rating::Excellent);
        assert_eq!(report.assessment.consistency_score, 100.0);
        assert_eq!(report.assessment.data_points, 30);
        assert_eq!(report.zone.map(|z| z.id), Some("metro-manila".to_string()));
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 0);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_skips_irradiance() {
        let provider = Arc::new(FakeProvider::new(Reply::Constant(5.0)));
        let service = service(Arc::new(FakeGeocoder::default()), provider.clone());

        let err = service
            .assess(&LocationQuery::text("Nowhere Town"))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::NotFound { .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_out_of_bounds_point_skips_irradiance() {
        let provider = Arc::new(FakeProvider::new(Reply::Constant(5.0)));
        let service = service(Arc::new(FakeGeocoder::default()), provider.clone());

        let err = service
            .assess(&LocationQuery::Coordinates(GeoPoint::new(35.6762, 139.6503)))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::OutOfBounds { .. }));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_upstream_data() {
        let service = service(
            Arc::new(FakeGeocoder::default()),
            Arc::new(FakeProvider::new(Reply::Empty)),
        );
        let err = service
            .assess(&LocationQuery::MapClick(GeoPoint::new(12.0, 118.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::UpstreamEmptyData { .. }));
    }

    #[tokio::test]
    async fn test_upstream_timeout_propagates() {
        let service = service(
            Arc::new(FakeGeocoder::default()),
            Arc::new(FakeProvider::new(Reply::Timeout)),
        );
        let err = service
            .assess(&LocationQuery::text("Cebu"))
            .await
            .unwrap_err();
        assert!(err.is_upstream());
        assert!(matches!(err, SolarPalError::UpstreamTimeout { .. }));
    }

    #[tokio::test]
    async fn test_geocoded_site_outside_zones() {
        let geocoder = Arc::new(FakeGeocoder {
            hit: Some(GeocodeHit {
                point: GeoPoint::new(20.3294, 121.8728),
                display_name: "Sabtang, Batanes, Philippines".to_string(),
            }),
            ..Default::default()
        });
        let service = service(
            geocoder.clone(),
            Arc::new(FakeProvider::new(Reply::Constant(4.0))),
        );

        let report = service.assess(&LocationQuery::text("Sabtang")).await.unwrap();
        assert_eq!(report.assessment.location, "Sabtang, Batanes, Philippines");
        assert_eq!(report.assessment.rating, Rating::Fair);
        assert!(report.zone.is_none());
        assert_eq!(geocoder.calls.load(Ordering::SeqCst), 1);

        let resolved = service.resolve(&LocationQuery::text("Sabtang")).await.unwrap();
        assert_eq!(resolved.tier, ResolutionTier::Geocoder);
    }

    #[tokio::test]
    async fn test_report_serializes_flat() {
        let service = service(
            Arc::new(FakeGeocoder::default()),
            Arc::new(FakeProvider::new(Reply::Constant(5.0))),
        );
        let report = service.assess(&LocationQuery::text("Davao")).await.unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["solar_score"], 78);
        assert_eq!(json["rating"], "Good");
        assert_eq!(json["zone"]["id"], "davao");
    }
}
