use axum::{extract::State, http::StatusCode, Extension, Json};
use rxlocate_core::{make_manual_pharmacy_id, AddressGeocoder};
use rxlocate_db::{ManualPharmacyRow, NewManualPharmacy};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct ManualPharmacyRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub full_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// POST /api/v1/pharmacies/manual — submit a pharmacy the map search did not
/// find. Stored pending review; search ignores it until approved.
pub(super) async fn submit_manual_pharmacy(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<ManualPharmacyRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ManualPharmacyRow>>), ApiError> {
    let rid = &req_id.0;

    let name = body.name.trim();
    if name.is_empty() || name.len() > 200 {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "name must be 1-200 characters",
        ));
    }
    let address = body.full_address.trim();
    if address.is_empty() {
        return Err(ApiError::new(
            rid,
            "validation_error",
            "full_address is required",
        ));
    }

    let validation = state.geocoder.validate(address).await.map_err(|e| {
        tracing::error!(error = %e, "address validation failed");
        ApiError::new(rid, "upstream_error", "address validation is unavailable")
    })?;
    let Some(coords) = validation.coordinates.filter(|_| validation.valid) else {
        return Err(ApiError::new(
            rid,
            "validation_error",
            format!("address could not be validated: {address}"),
        ));
    };

    let full_address = validation
        .normalized_address
        .unwrap_or_else(|| address.to_string());
    let new = NewManualPharmacy {
        pharmacy_id: make_manual_pharmacy_id(name, &full_address),
        name: name.to_string(),
        full_address,
        city: non_blank(body.city),
        state: non_blank(body.state),
        zip_code: non_blank(body.zip_code),
        phone_number: non_blank(body.phone_number),
        latitude: coords.lat,
        longitude: coords.lon,
    };

    let row = rxlocate_db::insert_manual_pharmacy(&state.pool, &new)
        .await
        .map_err(|e| map_db_error(rid.clone(), &e))?;
    tracing::info!(pharmacy_id = %row.pharmacy_id, "manual pharmacy submitted for review");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse {
            data: row,
            meta: ResponseMeta::new(req_id.0),
        }),
    ))
}
