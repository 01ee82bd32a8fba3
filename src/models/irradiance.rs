//! Daily irradiance samples as returned by the irradiance provider

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day of surface irradiance
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct IrradianceSample {
    pub date: NaiveDate,
    /// kWh/m²/day
    pub value: f64,
}

/// Date-ordered irradiance samples for one point
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct IrradianceSeries {
    pub samples: Vec<IrradianceSample>,
    /// Requested window, e.g. "20240101 to 20240131"
    pub period: String,
    /// Name of the provider the samples came from
    pub source: String,
}

impl IrradianceSeries {
    /// Build a series, sorting samples by date.
    pub fn new<P: Into<String>, S: Into<String>>(
        mut samples: Vec<IrradianceSample>,
        period: P,
        source: S,
    ) -> Self {
        samples.sort_by_key(|sample| sample.date);
        Self {
            samples,
            period: period.into(),
            source: source.into(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|sample| sample.value)
    }
}

/// Format a window the way the provider's date parameters are written
#[must_use]
pub fn format_period(start: NaiveDate, end: NaiveDate) -> String {
    format!("{} to {}", start.format("%Y%m%d"), end.format("%Y%m%d"))
}
