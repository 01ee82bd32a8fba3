use anyhow::Context;
use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::get,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{self, AppState};
use crate::config::ServerConfig;
use crate::{Result, SolarPalError};

fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    let origin = if server.allowed_origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        let origins = server
            .allowed_origins
            .iter()
            .map(|origin| {
                HeaderValue::from_str(origin).map_err(|e| {
                    SolarPalError::config(format!("Invalid allowed origin '{origin}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any))
}

/// Full application: health check, `/api` routes, CORS and request tracing
pub fn app(state: AppState, server: &ServerConfig) -> Result<Router> {
    let layers = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(server)?);

    Ok(Router::new()
        .route("/", get(api::health))
        .nest("/api", api::router())
        .layer(layers)
        .with_state(state))
}

pub async fn run(server: &ServerConfig, state: AppState) -> anyhow::Result<()> {
    let app = app(state, server)?;

    let addr = format!("{}:{}", server.host, server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Web server running at http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Web server stopped unexpectedly")?;

    tracing::info!("Web server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
