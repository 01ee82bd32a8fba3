use anyhow::Context;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Filter from `RUST_LOG` when set, otherwise the configured level for this
/// crate and the HTTP stack.
fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "solarpal={level},tower_http={level},warn",
            level = config.level
        ))
    })
}

/// Install the global subscriber. Call once at startup.
pub fn init(config: &LoggingConfig) -> anyhow::Result<()> {
    let layer = match config.format.as_str() {
        "json" => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_writer(std::io::stderr)
            .boxed(),
        _ => fmt::layer()
            .with_target(true)
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(layer.with_filter(env_filter(config)))
        .try_init()
        .context("Failed to install tracing subscriber")
}
