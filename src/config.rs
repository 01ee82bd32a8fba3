//! Configuration management for `SolarPal`
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings. The resulting
//! [`SolarPalConfig`] is built once at startup and handed to each component.

use crate::SolarPalError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SolarPalConfig {
    /// Supported region
    #[serde(default)]
    pub region: RegionConfig,
    /// Geocoding service settings
    #[serde(default)]
    pub geocoder: GeocoderConfig,
    /// Irradiance provider settings
    #[serde(default)]
    pub irradiance: IrradianceConfig,
    /// Scoring constants
    #[serde(default)]
    pub scoring: ScoringConfig,
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Rectangle of the supported region plus map defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_south")]
    pub south: f64,
    #[serde(default = "default_north")]
    pub north: f64,
    #[serde(default = "default_west")]
    pub west: f64,
    #[serde(default = "default_east")]
    pub east: f64,
    /// ISO 3166-1 alpha-2 code passed to the geocoder
    #[serde(default = "default_country_code")]
    pub country_code: String,
    /// Initial map center, consumed by the rendering layer
    #[serde(default = "default_center_latitude")]
    pub center_latitude: f64,
    #[serde(default = "default_center_longitude")]
    pub center_longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocoderConfig {
    #[serde(default = "default_geocoder_base_url")]
    pub base_url: String,
    #[serde(default = "default_geocoder_timeout")]
    pub timeout_seconds: u32,
    /// Nominatim rejects anonymous clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrradianceConfig {
    #[serde(default = "default_irradiance_base_url")]
    pub base_url: String,
    #[serde(default = "default_irradiance_timeout")]
    pub timeout_seconds: u32,
    /// Length of the trailing window in days
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_parameter")]
    pub parameter: String,
    #[serde(default = "default_community")]
    pub community: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Derating factor for panel and inverter losses
    #[serde(default = "default_system_efficiency")]
    pub system_efficiency: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// CORS origins; empty means any origin
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_south() -> f64 {
    4.5
}

fn default_north() -> f64 {
    21.5
}

fn default_west() -> f64 {
    116.0
}

fn default_east() -> f64 {
    127.0
}

fn default_country_code() -> String {
    "ph".to_string()
}

fn default_center_latitude() -> f64 {
    12.8797
}

fn default_center_longitude() -> f64 {
    121.774
}

fn default_geocoder_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_geocoder_timeout() -> u32 {
    10
}

fn default_user_agent() -> String {
    format!("SolarPal/{}", env!("CARGO_PKG_VERSION"))
}

fn default_irradiance_base_url() -> String {
    "https://power.larc.nasa.gov/api".to_string()
}

fn default_irradiance_timeout() -> u32 {
    30
}

fn default_window_days() -> u32 {
    30
}

fn default_parameter() -> String {
    "ALLSKY_SFC_SW_DWN".to_string()
}

fn default_community() -> String {
    "RE".to_string()
}

fn default_system_efficiency() -> f64 {
    0.85
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    [
        "http://localhost:3000",
        "http://localhost:3001",
        "http://localhost:3002",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:3001",
        "http://127.0.0.1:3002",
    ]
    .iter()
    .map(|origin| (*origin).to_string())
    .collect()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            south: default_south(),
            north: default_north(),
            west: default_west(),
            east: default_east(),
            country_code: default_country_code(),
            center_latitude: default_center_latitude(),
            center_longitude: default_center_longitude(),
        }
    }
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoder_base_url(),
            timeout_seconds: default_geocoder_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for IrradianceConfig {
    fn default() -> Self {
        Self {
            base_url: default_irradiance_base_url(),
            timeout_seconds: default_irradiance_timeout(),
            window_days: default_window_days(),
            parameter: default_parameter(),
            community: default_community(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            system_efficiency: default_system_efficiency(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SolarPalConfig {
    /// Load configuration from the default file location and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SOLARPAL_SERVER__PORT=9000 overrides server.port
        builder = builder.add_source(
            Environment::with_prefix("SOLARPAL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SolarPalConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("solarpal").join("config.toml"))
    }

    /// Apply default values to empty or zeroed configuration fields
    pub fn apply_defaults(&mut self) {
        if self.region.country_code.is_empty() {
            self.region.country_code = default_country_code();
        }
        if self.geocoder.base_url.is_empty() {
            self.geocoder.base_url = default_geocoder_base_url();
        }
        if self.geocoder.timeout_seconds == 0 {
            self.geocoder.timeout_seconds = default_geocoder_timeout();
        }
        if self.geocoder.user_agent.is_empty() {
            self.geocoder.user_agent = default_user_agent();
        }
        if self.irradiance.base_url.is_empty() {
            self.irradiance.base_url = default_irradiance_base_url();
        }
        if self.irradiance.timeout_seconds == 0 {
            self.irradiance.timeout_seconds = default_irradiance_timeout();
        }
        if self.irradiance.window_days == 0 {
            self.irradiance.window_days = default_window_days();
        }
        if self.irradiance.parameter.is_empty() {
            self.irradiance.parameter = default_parameter();
        }
        if self.irradiance.community.is_empty() {
            self.irradiance.community = default_community();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_region()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_region(&self) -> Result<()> {
        let region = &self.region;
        let values = [region.south, region.north, region.west, region.east];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(SolarPalError::config("Region bounds must be finite numbers").into());
        }

        if !(-90.0..=90.0).contains(&region.south) || !(-90.0..=90.0).contains(&region.north) {
            return Err(
                SolarPalError::config("Region latitudes must be between -90 and 90").into(),
            );
        }

        if !(-180.0..=180.0).contains(&region.west) || !(-180.0..=180.0).contains(&region.east) {
            return Err(
                SolarPalError::config("Region longitudes must be between -180 and 180").into(),
            );
        }

        if region.south >= region.north {
            return Err(
                SolarPalError::config("Region south bound must be below north bound").into(),
            );
        }

        if region.west >= region.east {
            return Err(SolarPalError::config("Region west bound must be below east bound").into());
        }

        if region.country_code.len() != 2 {
            return Err(SolarPalError::config(format!(
                "Invalid country code '{}'. Expected an ISO 3166-1 alpha-2 code",
                region.country_code
            ))
            .into());
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.geocoder.timeout_seconds > 300 {
            return Err(SolarPalError::config("Geocoder timeout cannot exceed 300 seconds").into());
        }

        if self.irradiance.timeout_seconds > 300 {
            return Err(
                SolarPalError::config("Irradiance timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.irradiance.window_days > 366 {
            return Err(SolarPalError::config("Irradiance window cannot exceed 366 days").into());
        }

        let efficiency = self.scoring.system_efficiency;
        if !efficiency.is_finite() || efficiency <= 0.0 || efficiency > 1.0 {
            return Err(SolarPalError::config(format!(
                "System efficiency must be in (0, 1], got {efficiency}"
            ))
            .into());
        }

        if self.server.port == 0 {
            return Err(SolarPalError::config("Server port cannot be 0").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SolarPalError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SolarPalError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoder", &self.geocoder.base_url),
            ("Irradiance", &self.irradiance.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SolarPalError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
