use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use solarpal::api::AppState;
use solarpal::{AssessmentService, SolarPalConfig, ZoneClassifier, logging, web};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::var_os("SOLARPAL_CONFIG") {
        Some(path) => SolarPalConfig::load_from_path(Some(PathBuf::from(path))),
        None => SolarPalConfig::load(),
    }
    .context("Failed to load configuration")?;

    logging::init(&config.logging)?;
    tracing::info!("Starting SolarPal API v{}", solarpal::VERSION);

    let zones = Arc::new(ZoneClassifier::builtin().context("Failed to load solar zones")?);
    let service = AssessmentService::from_config(&config, zones)
        .context("Failed to initialise assessment service")?;

    web::run(&config.server, AppState::new(service, config.region.clone())).await
}
