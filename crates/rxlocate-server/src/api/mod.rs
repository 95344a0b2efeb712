mod dashboard;
mod manual;
mod pharmacies;
mod reports;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use rxlocate_core::{LatLon, LocalCandidate, PharmacyCandidate};
use rxlocate_db::PgStore;
use rxlocate_providers::{NominatimClient, NominatimConfig, ProviderError};
use rxlocate_resolve::{PharmacySearch, TtlCache};
use serde::Serialize;
use sqlx::PgPool;
use std::{sync::Arc, time::Duration};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Search pipeline as wired in production: Nominatim for the authoritative
/// stream, Postgres for the local one, both behind in-process TTL caches.
pub type ServerSearch = PharmacySearch<
    NominatimClient,
    PgStore,
    TtlCache<Vec<PharmacyCandidate>>,
    TtlCache<Vec<LocalCandidate>>,
>;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub store: PgStore,
    pub search: Arc<ServerSearch>,
    pub geocoder: Arc<NominatimClient>,
}

impl AppState {
    /// Wire the store, search pipeline and geocoder around one pool.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError`] if a Nominatim client cannot be built from
    /// `geocoder`.
    pub fn new(
        pool: PgPool,
        geocoder: &NominatimConfig,
        cache_ttl: Duration,
    ) -> Result<Self, ProviderError> {
        let store = PgStore::new(pool.clone());
        let search = PharmacySearch::new(
            NominatimClient::new(geocoder)?,
            store.clone(),
            TtlCache::new(cache_ttl),
            TtlCache::new(cache_ttl),
        );
        Ok(Self {
            pool,
            store,
            search: Arc::new(search),
            geocoder: Arc::new(NominatimClient::new(geocoder)?),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_db_error(request_id: String, error: &rxlocate_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

/// Both coordinates present and inside WGS84 bounds.
pub(super) fn parse_origin(
    request_id: &str,
    lat: Option<f64>,
    lon: Option<f64>,
) -> Result<LatLon, ApiError> {
    let (Some(lat), Some(lon)) = (lat, lon) else {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            "lat and lon query parameters are required",
        ));
    };
    let origin = LatLon::new(lat, lon);
    if !origin.is_valid() {
        return Err(ApiError::new(
            request_id,
            "validation_error",
            format!("coordinates out of range: ({lat}, {lon})"),
        ));
    }
    Ok(origin)
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-request-id")])
}

fn api_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/pharmacies", get(pharmacies::list_nearby))
        .route("/api/v1/pharmacies/search", get(pharmacies::search))
        .route("/api/v1/pharmacies/manual", post(manual::submit_manual_pharmacy))
        .route("/api/v1/reports", post(reports::create_report))
        .route("/api/v1/dashboard", get(dashboard::get_dashboard))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(api_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match rxlocate_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn rate_limit_state(max_requests_per_minute: usize) -> RateLimitState {
    RateLimitState::new(max_requests_per_minute, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
