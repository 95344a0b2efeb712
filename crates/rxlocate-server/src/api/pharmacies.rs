//! Map and search endpoints.

use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::Utc;
use rxlocate_core::{PharmacyCandidate, ReportStore, DISPLAY_RADIUS_MILES};
use rxlocate_reports::{aggregate, nearest_first, AggregatedPharmacy};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, parse_origin, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct NearbyQuery {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub(super) struct SearchQuery {
    #[serde(default)]
    pub q: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// GET /api/v1/pharmacies — aggregated pharmacies with reports near the
/// caller, nearest first.
pub(super) async fn list_nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<NearbyQuery>,
) -> Result<Json<ApiResponse<Vec<AggregatedPharmacy>>>, ApiError> {
    let origin = parse_origin(&req_id.0, query.lat, query.lon)?;

    let reports = ReportStore::query_nearby(&state.store, origin, DISPLAY_RADIUS_MILES)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = nearest_first(aggregate(&reports, Utc::now()), origin);
    tracing::debug!(
        reports = reports.len(),
        pharmacies = data.len(),
        "aggregated nearby pharmacies"
    );

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// GET /api/v1/pharmacies/search — merged suggestions for the report form.
///
/// Upstream failures degrade to fewer suggestions; the list always ends with
/// the "add a pharmacy" action entry.
pub(super) async fn search(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<PharmacyCandidate>>>, ApiError> {
    let origin = parse_origin(&req_id.0, query.lat, query.lon)?;
    let data = state.search.search(query.q.trim(), origin).await;

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}
