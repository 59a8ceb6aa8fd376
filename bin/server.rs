// House Estimator - Web Server
// JSON API over the estimation engine, with geocoded lookups

use async_trait::async_trait;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use house_estimator::{
    all_profiles, clamp_manual_size, estimate, init_logging, lookup, AddressResolution,
    AddressResolver, Config, EstimateResult, GeocodeError, GoogleGeocoder, PostalCode,
    SearchQuery,
};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
struct AppState {
    resolver: Arc<dyn AddressResolver>,
    maps_api_key: Option<SecretString>,
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(data: T) -> Response {
        (
            StatusCode::OK,
            Json(ApiResponse {
                success: true,
                data: Some(data),
                error: None,
            }),
        )
            .into_response()
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (
        status,
        Json(ApiResponse::<()> {
            success: false,
            data: None,
            error: Some(message),
        }),
    )
        .into_response()
}

/// Stands in for the geocoder when no API key is configured
struct UnconfiguredResolver;

#[async_trait]
impl AddressResolver for UnconfiguredResolver {
    async fn resolve(&self, _query: &SearchQuery) -> Result<AddressResolution, GeocodeError> {
        Err(GeocodeError::MissingApiKey)
    }
}

#[derive(Deserialize)]
struct EstimateParams {
    province: Option<String>,
    house_size: Option<u32>,
}

#[derive(Deserialize)]
struct LookupParams {
    q: String,
    house_size: Option<u32>,
}

/// Geocoded address plus its estimate
#[derive(Serialize)]
struct LookupResponse {
    address: AddressResolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    map_url: Option<String>,
    estimate: EstimateResult,
}

#[derive(Serialize)]
struct ProvinceResponse {
    name: &'static str,
    abbreviation: &'static str,
    house_size_urban: u32,
    house_size_rural: u32,
    seasonal_factor: f64,
    climate_regions: Vec<&'static str>,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    ApiResponse::ok("OK")
}

/// GET /api/provinces - Estimation table
async fn get_provinces() -> impl IntoResponse {
    let provinces: Vec<ProvinceResponse> = all_profiles()
        .iter()
        .map(|p| ProvinceResponse {
            name: p.province.name(),
            abbreviation: p.province.abbreviation(),
            house_size_urban: p.house_size.urban,
            house_size_rural: p.house_size.rural,
            seasonal_factor: p.seasonal_factor,
            climate_regions: p.climate_regions.iter().map(|r| r.name).collect(),
        })
        .collect();

    ApiResponse::ok(provinces)
}

/// GET /api/estimate/:postal_code - Offline estimate for a postal code
async fn get_estimate(
    Path(postal_code): Path<String>,
    Query(params): Query<EstimateParams>,
) -> Response {
    match PostalCode::parse(&postal_code) {
        Ok(code) => {
            let result = estimate(
                &code,
                params.province.as_deref(),
                params.house_size.map(clamp_manual_size),
            );
            ApiResponse::ok(result)
        }
        Err(e) => error_response(
            StatusCode::BAD_REQUEST,
            format!("Please enter a valid Canadian postal code: {}", e),
        ),
    }
}

/// GET /api/lookup?q= - Geocode an address or postal code, then estimate
async fn get_lookup(State(state): State<AppState>, Query(params): Query<LookupParams>) -> Response {
    let size = params.house_size.map(clamp_manual_size);

    match lookup(state.resolver.as_ref(), &params.q, size).await {
        Ok((address, estimate)) => {
            let map_url = state
                .maps_api_key
                .as_ref()
                .map(|key| address.map_embed_url(key.expose_secret()));

            ApiResponse::ok(LookupResponse {
                address,
                map_url,
                estimate,
            })
        }
        Err(e) => {
            let status = match e {
                GeocodeError::InputTooShort => StatusCode::BAD_REQUEST,
                GeocodeError::MissingApiKey | GeocodeError::Request { .. } => {
                    StatusCode::BAD_GATEWAY
                }
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            tracing::info!(query = %params.q, "Lookup rejected: {:?}", e);
            error_response(status, e.to_string())
        }
    }
}

fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/provinces", get(get_provinces))
        .route("/estimate/:postal_code", get(get_estimate))
        .route("/lookup", get(get_lookup))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// Main Server
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = Config::from_env()?;
    let resolver: Arc<dyn AddressResolver> = match GoogleGeocoder::new(&config) {
        Ok(geocoder) => Arc::new(geocoder),
        Err(GeocodeError::MissingApiKey) => {
            tracing::warn!("GOOGLE_MAPS_API_KEY is not set; /api/lookup will answer 502");
            Arc::new(UnconfiguredResolver)
        }
        Err(e) => return Err(anyhow::anyhow!("Failed to build geocoder: {:?}", e)),
    };

    let state = AppState {
        resolver,
        maps_api_key: config.maps_api_key.clone(),
    };

    let listener = tokio::net::TcpListener::bind(&config.server_addr).await?;

    tracing::info!("House Estimator API listening on http://{}", config.server_addr);
    println!("🚀 Server running on http://{}", config.server_addr);
    println!("   API: http://{}/api/estimate/M5V2T6", config.server_addr);
    println!("\n   Press Ctrl+C to stop\n");

    axum::serve(listener, router(state)).await?;

    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================
