use axum::{extract::State, http::StatusCode, Extension, Json};
use chrono::{DateTime, Utc};
use rxlocate_core::{NewReport, Report, ReportError, ReportStore};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

/// Reports arriving over HTTP are stamped with the receive time; any
/// client-sent timestamp is discarded.
pub(super) fn validate_received(body: NewReport, now: DateTime<Utc>) -> Result<Report, ReportError> {
    NewReport {
        submission_time: None,
        ..body
    }
    .validate(now)
}

/// POST /api/v1/reports — validate and append one report.
///
/// Clears the cached local search stream so the reported pharmacy is
/// searchable immediately.
pub(super) async fn create_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<NewReport>,
) -> Result<(StatusCode, Json<ApiResponse<Report>>), ApiError> {
    let report = validate_received(body, Utc::now())
        .map_err(|e| ApiError::new(&req_id.0, "validation_error", e.to_string()))?;

    state
        .store
        .append(&report)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;
    state.search.invalidate_local();

    tracing::info!(
        pharmacy_id = %report.pharmacy_id,
        report_type = %report.report_type,
        "report stored"
    );

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: report,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
