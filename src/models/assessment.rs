//! Solar assessment produced by the score engine

use serde::{Deserialize, Serialize};
use std::fmt;

use super::GeoPoint;

/// Qualitative solar potential
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rating {
    Low,
    Fair,
    Good,
    Excellent,
}

impl Rating {
    /// Lowest solar score of each rating
    pub const EXCELLENT_MIN_SCORE: u8 = 87;
    pub const GOOD_MIN_SCORE: u8 = 70;
    pub const FAIR_MIN_SCORE: u8 = 50;

    /// Rating for a solar score.
    #[must_use]
    pub fn from_score(score: u8) -> Self {
        if score >= Self::EXCELLENT_MIN_SCORE {
            Rating::Excellent
        } else if score >= Self::GOOD_MIN_SCORE {
            Rating::Good
        } else if score >= Self::FAIR_MIN_SCORE {
            Rating::Fair
        } else {
            Rating::Low
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Excellent => "Excellent",
            Rating::Good => "Good",
            Rating::Fair => "Fair",
            Rating::Low => "Low",
        }
    }

    #[must_use]
    pub fn recommendation(&self) -> &'static str {
        match self {
            Rating::Excellent => {
                "Outstanding location for solar installation. High energy yield expected."
            }
            Rating::Good => "Suitable for solar installation. Good energy yield expected.",
            Rating::Fair => "Moderate potential for solar panels. Consider local factors.",
            Rating::Low => "Limited solar potential. Consider alternative energy sources.",
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Solar potential of one location over the sampled period
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SolarAssessment {
    pub location: String,
    pub coordinates: GeoPoint,
    /// kWh/m²/day, two decimals like min and max
    pub avg_irradiance: f64,
    pub min_irradiance: f64,
    pub max_irradiance: f64,
    /// 0-100 to one decimal, higher is steadier
    pub consistency_score: f64,
    /// 0-100
    pub solar_score: u8,
    pub rating: Rating,
    pub recommendation: String,
    /// Whole kWh per kW of installed capacity
    pub estimated_annual_kwh_per_kw: f64,
    pub data_points: usize,
    pub period: String,
    /// Human-readable summary of the analysed point
    pub analysis_note: String,
}
