use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rxlocate_core::ReportStore;
use rxlocate_reports::{aggregate, summarize, AggregatedPharmacy, DashboardSummary};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct DashboardQuery {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub(super) struct DashboardData {
    pub summary: DashboardSummary,
    pub pharmacies: Vec<AggregatedPharmacy>,
}

/// `Some((start, end))` for a timeframe request, `None` for all time.
pub(super) fn resolve_timeframe(
    request_id: &str,
    query: &DashboardQuery,
) -> Result<Option<(DateTime<Utc>, DateTime<Utc>)>, ApiError> {
    match (query.start, query.end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) if start < end => Ok(Some((start, end))),
        (Some(_), Some(_)) => Err(ApiError::new(
            request_id,
            "validation_error",
            "start must be before end",
        )),
        _ => Err(ApiError::new(
            request_id,
            "validation_error",
            "start and end must be given together",
        )),
    }
}

/// GET /api/v1/dashboard — every pharmacy aggregated over all reports, or
/// over `[start, end)` when both bounds are given.
pub(super) async fn get_dashboard(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<ApiResponse<DashboardData>>, ApiError> {
    let reports = match resolve_timeframe(&req_id.0, &query)? {
        Some((start, end)) => state.store.query_by_timeframe(start, end).await,
        None => state.store.query_all().await,
    }
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let aggregated = aggregate(&reports, Utc::now());
    let summary = summarize(&aggregated);

    Ok(Json(ApiResponse {
        data: DashboardData {
            summary,
            pharmacies: aggregated.into_values().collect(),
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
