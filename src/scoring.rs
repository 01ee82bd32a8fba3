//! Irradiance scoring
//!
//! Converts a daily irradiance series into a [`SolarAssessment`]. The score
//! is a banded, monotonically increasing function of the average daily
//! irradiance, calibrated to Philippine climate (typically 4.5–6.5
//! kWh/m²/day). Within a band the score is linear in the average and
//! truncated to an integer.

use tracing::debug;

use crate::config::ScoringConfig;
use crate::models::{GeoPoint, IrradianceSeries, Rating, ResolvedLocation, SolarAssessment};
use crate::{Result, SolarPalError};

/// Typical panel and inverter derating
pub const DEFAULT_SYSTEM_EFFICIENCY: f64 = 0.85;

const DAYS_PER_YEAR: f64 = 365.0;

struct Band {
    rating: Rating,
    /// Inclusive lower cut point in kWh/m²/day
    min_avg: f64,
    /// Average at which the band's top score is reached
    max_avg: f64,
    min_score: u8,
    max_score: u8,
    /// Score the linear ramp heads towards at `max_avg`
    ramp_to: f64,
}

const BANDS: [Band; 4] = [
    Band {
        rating: Rating::Excellent,
        min_avg: 5.5,
        max_avg: 6.5,
        min_score: Rating::EXCELLENT_MIN_SCORE,
        max_score: 100,
        ramp_to: 100.0,
    },
    Band {
        rating: Rating::Good,
        min_avg: 4.5,
        max_avg: 5.5,
        min_score: Rating::GOOD_MIN_SCORE,
        max_score: Rating::EXCELLENT_MIN_SCORE - 1,
        ramp_to: Rating::EXCELLENT_MIN_SCORE as f64,
    },
    Band {
        rating: Rating::Fair,
        min_avg: 3.5,
        max_avg: 4.5,
        min_score: Rating::FAIR_MIN_SCORE,
        max_score: Rating::GOOD_MIN_SCORE - 1,
        ramp_to: Rating::GOOD_MIN_SCORE as f64,
    },
    Band {
        rating: Rating::Low,
        min_avg: 0.0,
        max_avg: 3.5,
        min_score: 0,
        max_score: Rating::FAIR_MIN_SCORE - 1,
        ramp_to: Rating::FAIR_MIN_SCORE as f64,
    },
];

fn band_for(avg: f64) -> &'static Band {
    BANDS
        .iter()
        .find(|band| avg >= band.min_avg)
        .unwrap_or(&BANDS[BANDS.len() - 1])
}

/// Rating band of an average daily irradiance
#[must_use]
pub fn band_rating(avg: f64) -> Rating {
    band_for(avg).rating
}

/// Solar score (0-100) of an average daily irradiance
#[must_use]
pub fn solar_score(avg: f64) -> u8 {
    if !avg.is_finite() {
        return 0;
    }

    let band = band_for(avg);
    let fraction = ((avg - band.min_avg) / (band.max_avg - band.min_avg)).clamp(0.0, 1.0);
    let raw = f64::from(band.min_score) + fraction * (band.ramp_to - f64::from(band.min_score));

    // Truncation keeps a value just below a cut point inside its own band.
    (raw.floor() as u8).clamp(band.min_score, band.max_score)
}

/// Stability of the series, 100 when every day is identical.
///
/// `100 * (1 - stdev / mean)` with the population standard deviation,
/// clamped to 0..=100. A zero mean yields 0.
#[must_use]
pub fn consistency_score(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 || !mean.is_finite() {
        return 0.0;
    }

    let (min, max) = min_max(values);
    if min == max {
        return 100.0;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let stdev = variance.sqrt();

    (100.0 * (1.0 - stdev / mean)).clamp(0.0, 100.0)
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

fn analysis_note(point: &GeoPoint) -> String {
    format!(
        "Solar analysis for precise coordinates: {:.6}°N, {:.6}°E",
        point.latitude, point.longitude
    )
}

/// Turns irradiance series into assessments
#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine {
    system_efficiency: f64,
}

impl ScoreEngine {
    #[must_use]
    pub fn new(system_efficiency: f64) -> Self {
        Self { system_efficiency }
    }

    #[must_use]
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(config.system_efficiency)
    }

    /// Yearly output of a 1 kW system at this average
    #[must_use]
    pub fn annual_kwh_per_kw(&self, avg: f64) -> f64 {
        avg * DAYS_PER_YEAR * self.system_efficiency
    }

    pub fn score(
        &self,
        location: &ResolvedLocation,
        series: &IrradianceSeries,
    ) -> Result<SolarAssessment> {
        if series.is_empty() {
            return Err(SolarPalError::upstream_empty(
                series.source.clone(),
                format!("no samples for {}", location.display_name),
            ));
        }

        let values: Vec<f64> = series.values().collect();
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SolarPalError::upstream(
                series.source.clone(),
                "irradiance series contains non-finite values",
            ));
        }

        let avg = values.iter().sum::<f64>() / values.len() as f64;
        let (min, max) = min_max(&values);
        let solar_score = solar_score(avg);
        let rating = Rating::from_score(solar_score);

        debug!(
            "Scored {} samples for {}: avg {:.2}, score {}, {}",
            values.len(),
            location.display_name,
            avg,
            solar_score,
            rating
        );

        // Score and rating come from the unrounded average; only the
        // reported figures are rounded.
        Ok(SolarAssessment {
            location: location.display_name.clone(),
            coordinates: location.point,
            avg_irradiance: round_to(avg, 2),
            min_irradiance: round_to(min, 2),
            max_irradiance: round_to(max, 2),
            consistency_score: round_to(consistency_score(&values), 1),
            solar_score,
            rating,
            recommendation: rating.recommendation().to_string(),
            estimated_annual_kwh_per_kw: round_to(self.annual_kwh_per_kw(avg), 0),
            data_points: values.len(),
            period: series.period.clone(),
            analysis_note: analysis_note(&location.point),
        })
    }
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_EFFICIENCY)
    }
}
