//! Historical irradiance retrieval
//!
//! [`IrradianceFetcher`] asks an [`IrradianceProvider`] for the trailing
//! window of daily samples at a point and guarantees the returned series is
//! non-empty. Calls are single-attempt; the provider bounds them in time.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, Utc};
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::models::irradiance::format_period;
use crate::models::{GeoPoint, IrradianceSample, IrradianceSeries};
use crate::{Result, SolarPalError};

pub mod nasa_power;

pub use nasa_power::NasaPowerClient;

/// Source of daily irradiance values in kWh/m²/day
#[async_trait]
pub trait IrradianceProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Daily samples for `start..=end`. Provider fill values are already removed.
    async fn daily_irradiance(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<IrradianceSample>>;
}

pub struct IrradianceFetcher {
    provider: Arc<dyn IrradianceProvider>,
    window_days: u32,
}

impl IrradianceFetcher {
    pub fn new(provider: Arc<dyn IrradianceProvider>, window_days: u32) -> Self {
        Self {
            provider,
            window_days,
        }
    }

    /// Window of `window_days` days ending on `end`
    #[must_use]
    pub fn window_ending(&self, end: NaiveDate) -> (NaiveDate, NaiveDate) {
        (end - Duration::days(i64::from(self.window_days)), end)
    }

    /// Fetch the trailing window ending today (UTC)
    pub async fn fetch(&self, point: &GeoPoint) -> Result<IrradianceSeries> {
        self.fetch_until(point, Utc::now().date_naive()).await
    }

    #[instrument(skip(self), fields(provider = self.provider.name()))]
    pub async fn fetch_until(&self, point: &GeoPoint, end: NaiveDate) -> Result<IrradianceSeries> {
        let (start, end) = self.window_ending(end);
        let period = format_period(start, end);

        let samples = self.provider.daily_irradiance(point, start, end).await?;

        if samples.is_empty() {
            warn!(
                "No irradiance samples for {} over {}",
                point.format_coordinates(),
                period
            );
            return Err(SolarPalError::upstream_empty(
                self.provider.name(),
                format!("no samples for {} over {}", point.format_coordinates(), period),
            ));
        }

        info!(
            "Retrieved {} irradiance samples for {} over {}",
            samples.len(),
            point.format_coordinates(),
            period
        );

        Ok(IrradianceSeries::new(samples, period, self.provider.name()))
    }
}
