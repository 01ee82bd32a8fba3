use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};

use crate::SolarPalError;
use crate::config::RegionConfig;
use crate::models::{GeoPoint, LocationQuery};
use crate::service::{AssessmentService, SiteReport};
use crate::zones::{SolarZone, ZoneStatistics};

type ApiResult<T> = Result<Json<T>, SolarPalError>;

/// Shared, read-only request state
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<AssessmentService>,
    pub region: Arc<RegionConfig>,
}

impl AppState {
    pub fn new(service: AssessmentService, region: RegionConfig) -> Self {
        Self {
            service: Arc::new(service),
            region: Arc::new(region),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CoordinateParams {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl CoordinateParams {
    fn point(&self) -> Result<GeoPoint, SolarPalError> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Ok(GeoPoint::new(lat, lon)),
            _ => Err(SolarPalError::validation(
                "Both 'lat' and 'lon' query parameters are required",
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub message: &'static str,
    pub status: &'static str,
}

/// Supported area and initial map view
#[derive(Serialize)]
pub struct ApiRegion {
    pub country_code: String,
    pub south: f64,
    pub north: f64,
    pub west: f64,
    pub east: f64,
    pub center: GeoPoint,
}

impl From<&RegionConfig> for ApiRegion {
    fn from(region: &RegionConfig) -> Self {
        Self {
            country_code: region.country_code.clone(),
            south: region.south,
            north: region.north,
            west: region.west,
            east: region.east,
            center: GeoPoint::new(region.center_latitude, region.center_longitude),
        }
    }
}

#[derive(Serialize)]
pub struct ApiNearestZone {
    pub zone: SolarZone,
    pub distance_km: f64,
}

#[derive(Serialize)]
pub struct ApiZoneLookup {
    pub point: GeoPoint,
    pub zone: Option<SolarZone>,
    pub nearest: Option<ApiNearestZone>,
}

fn params<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, SolarPalError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| SolarPalError::validation(rejection.body_text()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/solar", get(solar_by_coordinates))
        .route("/solar/search", get(solar_by_name))
        .route("/region", get(region))
        .route("/zones", get(list_zones))
        .route("/zones/statistics", get(zone_statistics))
        .route("/zones/classify", get(classify_point))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "SolarPal API is running!",
        status: "healthy",
    })
}

async fn solar_by_coordinates(
    State(state): State<AppState>,
    query: Result<Query<CoordinateParams>, QueryRejection>,
) -> ApiResult<SiteReport> {
    let point = params(query)?.point()?;
    let report = state
        .service
        .assess(&LocationQuery::Coordinates(point))
        .await?;
    Ok(Json(report))
}

async fn solar_by_name(
    State(state): State<AppState>,
    query: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SiteReport> {
    let text = params(query)?.q.unwrap_or_default();
    let report = state.service.assess(&LocationQuery::Text(text)).await?;
    Ok(Json(report))
}

async fn region(State(state): State<AppState>) -> Json<ApiRegion> {
    Json(ApiRegion::from(state.region.as_ref()))
}

async fn list_zones(State(state): State<AppState>) -> Json<Vec<SolarZone>> {
    Json(state.service.zones().zones().to_vec())
}

async fn zone_statistics(State(state): State<AppState>) -> Json<ZoneStatistics> {
    Json(state.service.zones().statistics().clone())
}

async fn classify_point(
    State(state): State<AppState>,
    query: Result<Query<CoordinateParams>, QueryRejection>,
) -> ApiResult<ApiZoneLookup> {
    let point = params(query)?.point()?;
    if !point.is_finite() {
        return Err(SolarPalError::validation("Coordinates must be finite numbers"));
    }

    let zones = state.service.zones();
    Ok(Json(ApiZoneLookup {
        point,
        zone: zones.classify(&point).cloned(),
        nearest: zones
            .nearest(&point)
            .map(|(zone, distance_km)| ApiNearestZone {
                zone: zone.clone(),
                distance_km,
            }),
    }))
}
