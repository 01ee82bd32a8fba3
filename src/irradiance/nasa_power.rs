//! NASA POWER daily point API client
//!
//! Queries `temporal/daily/point` for all-sky surface shortwave downward
//! irradiance, which POWER reports in kWh/m²/day.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

use super::IrradianceProvider;
use crate::config::IrradianceConfig;
use crate::models::{GeoPoint, IrradianceSample};
use crate::{Result, SolarPalError};

const SERVICE: &str = "NASA POWER";

/// POWER marks missing days with this value
pub const FILL_VALUE: f64 = -999.0;

#[derive(Debug, Deserialize)]
struct PowerResponse {
    properties: PowerProperties,
}

#[derive(Debug, Deserialize)]
struct PowerProperties {
    parameter: HashMap<String, BTreeMap<String, Option<f64>>>,
}

pub struct NasaPowerClient {
    client: Client,
    base_url: String,
    parameter: String,
    community: String,
}

impl NasaPowerClient {
    pub fn new(config: &IrradianceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(concat!("SolarPal/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SolarPalError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            parameter: config.parameter.clone(),
            community: config.community.clone(),
        })
    }

    fn daily_url(&self, point: &GeoPoint, start: NaiveDate, end: NaiveDate) -> String {
        format!(
            "{}/temporal/daily/point?parameters={}&community={}&longitude={}&latitude={}&start={}&end={}&format=JSON",
            self.base_url,
            urlencoding::encode(&self.parameter),
            urlencoding::encode(&self.community),
            point.longitude,
            point.latitude,
            start.format("%Y%m%d"),
            end.format("%Y%m%d")
        )
    }

    /// Pull the configured parameter out of a POWER response body.
    fn parse_daily_values(&self, body: PowerResponse) -> Result<Vec<IrradianceSample>> {
        let Some(values) = body.properties.parameter.get(&self.parameter) else {
            return Err(SolarPalError::upstream(
                SERVICE,
                format!("response has no '{}' parameter", self.parameter),
            ));
        };

        let mut samples = Vec::with_capacity(values.len());
        for (raw_date, value) in values {
            let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y%m%d") else {
                warn!("Skipping sample with unparseable date '{}'", raw_date);
                continue;
            };

            match value {
                Some(value) if is_valid_sample(*value) => samples.push(IrradianceSample {
                    date,
                    value: *value,
                }),
                _ => debug!("Dropping fill value for {}", raw_date),
            }
        }

        Ok(samples)
    }
}

fn is_valid_sample(value: f64) -> bool {
    value.is_finite() && value != FILL_VALUE && value >= 0.0
}

#[async_trait]
impl IrradianceProvider for NasaPowerClient {
    fn name(&self) -> &'static str {
        SERVICE
    }

    #[instrument(skip(self))]
    async fn daily_irradiance(
        &self,
        point: &GeoPoint,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<IrradianceSample>> {
        info!(
            "Getting daily irradiance for coordinates: {}",
            point.format_coordinates()
        );
        let start_time = Instant::now();

        let url = self.daily_url(point, start, end);
        debug!("NASA POWER request URL: {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("NASA POWER request failed: {}", e);
            SolarPalError::from_transport(SERVICE, &e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("NASA POWER returned HTTP {}", status);
            return Err(SolarPalError::upstream(
                SERVICE,
                format!("HTTP {}", status.as_u16()),
            ));
        }

        let parse_start = Instant::now();
        let body: PowerResponse = response
            .json()
            .await
            .map_err(|e| SolarPalError::from_transport(SERVICE, &e))?;
        let samples = self.parse_daily_values(body)?;

        let total_duration = start_time.elapsed();
        info!(
            "Retrieved {} daily values in {:.3}s (parse: {:.3}s)",
            samples.len(),
            total_duration.as_secs_f64(),
            parse_start.elapsed().as_secs_f64()
        );

        if total_duration.as_secs() > 10 {
            warn!(
                "Slow NASA POWER response: {:.3}s",
                total_duration.as_secs_f64()
            );
        }

        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> NasaPowerClient {
        NasaPowerClient::new(&IrradianceConfig::default()).unwrap()
    }

    fn body(json: &str) -> PowerResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_daily_url() {
        let url = client().daily_url(
            &GeoPoint::new(14.5995, 120.9842),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        );
        assert_eq!(
            url,
            "https://power.larc.nasa.gov/api/temporal/daily/point?parameters=ALLSKY_SFC_SW_DWN&community=RE&longitude=120.9842&latitude=14.5995&start=20240301&end=20240331&format=JSON"
        );
    }

    #[test]
    fn test_parse_drops_fill_values() {
        let samples = client()
            .parse_daily_values(body(
                r#"{
                    "type": "Feature",
                    "properties": {
                        "parameter": {
                            "ALLSKY_SFC_SW_DWN": {
                                "20240301": 5.84,
                                "20240302": 6.12,
                                "20240303": -999.0,
                                "20240304": null
                            }
                        }
                    }
                }"#,
            ))
            .unwrap();

        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].date, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(samples[0].value, 5.84);
        assert_eq!(samples[1].value, 6.12);
    }

    #[test]
    fn test_parse_all_fill_values_yields_no_samples() {
        let samples = client()
            .parse_daily_values(body(
                r#"{"properties": {"parameter": {"ALLSKY_SFC_SW_DWN": {"20240301": -999.0}}}}"#,
            ))
            .unwrap();
        assert!(samples.is_empty());
    }

    #[test]
    fn test_parse_missing_parameter() {
        let err = client()
            .parse_daily_values(body(
                r#"{"properties": {"parameter": {"T2M": {"20240301": 28.1}}}}"#,
            ))
            .unwrap_err();
        assert!(matches!(err, SolarPalError::Upstream { .. }));
    }

    #[test]
    fn test_parse_skips_bad_dates() {
        let samples = client()
            .parse_daily_values(body(
                r#"{"properties": {"parameter": {"ALLSKY_SFC_SW_DWN": {"2024-03-01": 5.0, "20240302": 4.0}}}}"#,
            ))
            .unwrap();
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].value, 4.0);
    }

    /// Accepts connections and never writes a byte back.
    async fn silent_server() -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });
        format!("http://{addr}")
    }

    #[tokio::test]
    async fn test_unresponsive_provider_times_out() {
        let client = NasaPowerClient::new(&IrradianceConfig {
            base_url: silent_server().await,
            timeout_seconds: 1,
            ..IrradianceConfig::default()
        })
        .unwrap();

        let err = client
            .daily_irradiance(
                &GeoPoint::new(14.5995, 120.9842),
                NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, SolarPalError::UpstreamTimeout { .. }), "{err}");
        assert_eq!(err.user_message(), crate::error::UNAVAILABLE_MESSAGE);
    }
}
