//! Location Resolution Module
//!
//! This module resolves location queries (place names, coordinate pairs,
//! map clicks) into validated points inside the supported region.

use std::sync::Arc;
use tracing::{debug, info};

use crate::bounds::BoundsValidator;
use crate::config::RegionConfig;
use crate::location::{
    CoordinateParser, Gazetteer, Geocoder, GeocoderStrategy, LocationStrategy, describe_point,
};
use crate::models::{LocationQuery, ResolutionTier, ResolvedLocation};
use crate::{Result, SolarPalError};

/// Ordered fallback chain over [`LocationStrategy`] tiers.
///
/// Tiers run in list order and the first one that answers wins; later tiers
/// are never consulted and results are never compared across tiers.
pub struct LocationResolver {
    strategies: Vec<Box<dyn LocationStrategy>>,
    bounds: BoundsValidator,
}

impl LocationResolver {
    pub fn new(strategies: Vec<Box<dyn LocationStrategy>>, bounds: BoundsValidator) -> Self {
        Self { strategies, bounds }
    }

    /// Gazetteer, then literal coordinates, then the external geocoder.
    pub fn standard(region: &RegionConfig, geocoder: Arc<dyn Geocoder>) -> Self {
        Self::new(
            vec![
                Box::new(Gazetteer),
                Box::new(CoordinateParser::default()),
                Box::new(GeocoderStrategy::from_config(geocoder, region)),
            ],
            BoundsValidator::from_config(region),
        )
    }

    /// Names of the tiers in priority order
    pub fn tiers(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Resolve a location query into a structured location
    pub async fn resolve(&self, query: &LocationQuery) -> Result<ResolvedLocation> {
        debug!("Resolving location query: {:?}", query);

        let location = match query {
            LocationQuery::Text(text) => self.resolve_text(text).await?,
            LocationQuery::Coordinates(point) | LocationQuery::MapClick(point) => {
                self.bounds.check(point)?;
                ResolvedLocation::new(*point, describe_point(point), ResolutionTier::Direct)
            }
        };

        debug!(
            "Resolved location: {} at ({}, {})",
            location.display_name, location.point.latitude, location.point.longitude
        );

        Ok(location)
    }

    async fn resolve_text(&self, text: &str) -> Result<ResolvedLocation> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SolarPalError::validation("Location cannot be empty"));
        }

        for strategy in &self.strategies {
            if let Some(location) = strategy.attempt(text).await? {
                info!("Resolved '{}' via {} tier", text, strategy.name());
                return Ok(location);
            }
            debug!("Tier {} had no match for '{}'", strategy.name(), text);
        }

        Err(SolarPalError::not_found(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::GeocodeHit;
    use crate::models::GeoPoint;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingGeocoder {
        hit: Option<GeocodeHit>,
        calls: AtomicUsize,
    }

    impl CountingGeocoder {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Geocoder for CountingGeocoder {
        async fn search(&self, _query: &str, _country_code: &str) -> Result<Option<GeocodeHit>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.hit.clone())
        }
    }

    struct FailingGeocoder;

    #[async_trait]
    impl Geocoder for FailingGeocoder {
        async fn search(&self, _query: &str, _country_code: &str) -> Result<Option<GeocodeHit>> {
            Err(SolarPalError::upstream_timeout("geocoder", "timed out"))
        }
    }

    struct Fixed(&'static str, Option<ResolvedLocation>);

    #[async_trait]
    impl LocationStrategy for Fixed {
        fn name(&self) -> &'static str {
            self.0
        }

        async fn attempt(&self, _query: &str) -> Result<Option<ResolvedLocation>> {
            Ok(self.1.clone())
        }
    }

    fn resolver_with(geocoder: Arc<CountingGeocoder>) -> LocationResolver {
        LocationResolver::standard(&RegionConfig::default(), geocoder)
    }

    #[test]
    fn test_tier_order() {
        let resolver = resolver_with(Arc::new(CountingGeocoder::default()));
        assert_eq!(resolver.tiers(), vec!["gazetteer", "coordinates", "geocoder"]);
    }

    #[tokio::test]
    async fn test_gazetteer_skips_geocoder() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let resolver = resolver_with(geocoder.clone());

        let location = resolver.resolve(&LocationQuery::text("Manila")).await.unwrap();
        assert_eq!(location.point, GeoPoint::new(14.5995, 120.9842));
        assert_eq!(location.tier, ResolutionTier::Gazetteer);
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_coordinates_skip_geocoder() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let resolver = resolver_with(geocoder.clone());

        let location = resolver
            .resolve(&LocationQuery::text("14.6042,121.0348"))
            .await
            .unwrap();
        assert_eq!(location.point, GeoPoint::new(14.6042, 121.0348));
        assert_eq!(location.tier, ResolutionTier::Coordinates);
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_rejected_coordinates_never_reach_geocoder() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let resolver = resolver_with(geocoder.clone());

        let err = resolver
            .resolve(&LocationQuery::text("35.6762,139.6503"))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::OutOfBounds { .. }));

        let err = resolver
            .resolve(&LocationQuery::text("14.6.1,121"))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::Validation { .. }));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_exponent_form_pair_skips_geocoder() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let resolver = resolver_with(geocoder.clone());

        let location = resolver
            .resolve(&LocationQuery::text("1.46042e1,121.0348"))
            .await
            .unwrap();
        assert_eq!(location.tier, ResolutionTier::Coordinates);
        assert_eq!(location.point, GeoPoint::new(14.6042, 121.0348));
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_non_finite_pairs_never_reach_geocoder() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let resolver = resolver_with(geocoder.clone());

        for input in ["NaN,121", "inf,121", "14.6,-inf"] {
            let err = resolver
                .resolve(&LocationQuery::text(input))
                .await
                .unwrap_err();
            assert!(matches!(err, SolarPalError::Validation { .. }), "{input}: {err}");
        }
        assert_eq!(geocoder.calls(), 0);
    }

    #[tokio::test]
    async fn test_geocoder_fallback() {
        let geocoder = Arc::new(CountingGeocoder {
            hit: Some(GeocodeHit {
                point: GeoPoint::new(13.4125, 121.18),
                display_name: "Calapan, Philippines".to_string(),
            }),
            ..Default::default()
        });
        let resolver = resolver_with(geocoder.clone());

        let location = resolver.resolve(&LocationQuery::text("Calapan")).await.unwrap();
        assert_eq!(location.tier, ResolutionTier::Geocoder);
        assert_eq!(location.display_name, "Calapan, Philippines");
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_not_found_when_every_tier_declines() {
        let geocoder = Arc::new(CountingGeocoder::default());
        let resolver = resolver_with(geocoder.clone());

        let err = resolver
            .resolve(&LocationQuery::text("Atlantis"))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::NotFound { .. }));
        assert_eq!(geocoder.calls(), 1);
    }

    #[tokio::test]
    async fn test_geocoder_failure_propagates() {
        let resolver =
            LocationResolver::standard(&RegionConfig::default(), Arc::new(FailingGeocoder));
        let err = resolver
            .resolve(&LocationQuery::text("Calapan"))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::UpstreamTimeout { .. }));
    }

    #[tokio::test]
    async fn test_empty_query_is_rejected() {
        let resolver = resolver_with(Arc::new(CountingGeocoder::default()));
        let err = resolver.resolve(&LocationQuery::text("   ")).await.unwrap_err();
        assert!(matches!(err, SolarPalError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_first_match_wins() {
        let first = ResolvedLocation::new(
            GeoPoint::new(10.0, 120.0),
            "first",
            ResolutionTier::Gazetteer,
        );
        let second = ResolvedLocation::new(
            GeoPoint::new(11.0, 121.0),
            "second",
            ResolutionTier::Geocoder,
        );
        let resolver = LocationResolver::new(
            vec![
                Box::new(Fixed("empty", None)),
                Box::new(Fixed("first", Some(first.clone()))),
                Box::new(Fixed("second", Some(second))),
            ],
            BoundsValidator::default(),
        );

        let location = resolver.resolve(&LocationQuery::text("anything")).await.unwrap();
        assert_eq!(location, first);
    }

    #[tokio::test]
    async fn test_direct_points_are_bounds_checked() {
        let resolver = resolver_with(Arc::new(CountingGeocoder::default()));

        let location = resolver
            .resolve(&LocationQuery::MapClick(GeoPoint::new(7.1, 125.6)))
            .await
            .unwrap();
        assert_eq!(location.tier, ResolutionTier::Direct);
        assert_eq!(location.display_name, "Davao City");

        let err = resolver
            .resolve(&LocationQuery::Coordinates(GeoPoint::new(22.0, 121.0)))
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::OutOfBounds { .. }));
    }

    #[tokio::test]
    async fn test_literal_pair_round_trip_is_bit_exact() {
        let resolver = resolver_with(Arc::new(CountingGeocoder::default()));
        let query = LocationQuery::text("14.6042,121.0348");

        let first = resolver.resolve(&query).await.unwrap();
        let second = resolver.resolve(&query).await.unwrap();
        assert_eq!(first.point.latitude.to_bits(), second.point.latitude.to_bits());
        assert_eq!(first.point.longitude.to_bits(), second.point.longitude.to_bits());

        let again = resolver
            .resolve(&LocationQuery::Coordinates(first.point))
            .await
            .unwrap();
        assert_eq!(again.point.latitude.to_bits(), first.point.latitude.to_bits());
        assert_eq!(again.point.longitude.to_bits(), first.point.longitude.to_bits());
    }
}
