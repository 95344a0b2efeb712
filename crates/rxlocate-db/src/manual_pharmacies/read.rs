//! Read operations for the `manual_pharmacies` table.

use rxlocate_core::{bounding_box, within_radius, LatLon, LocalCandidate};
use sqlx::PgPool;

use super::types::{ManualPharmacyRow, MANUAL_COLUMNS};
use crate::DbError;

/// Manual pharmacies within `radius_miles` of `origin`, approved or not.
///
/// Pending entries are returned flagged so callers decide whether to show
/// them; search drops them.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_manual_pharmacies_nearby(
    pool: &PgPool,
    origin: LatLon,
    radius_miles: f64,
) -> Result<Vec<LocalCandidate>, DbError> {
    let bbox = bounding_box(origin, radius_miles);
    let sql = format!(
        "SELECT {MANUAL_COLUMNS} FROM manual_pharmacies \
         WHERE latitude BETWEEN $1 AND $2 \
           AND longitude BETWEEN $3 AND $4 \
         ORDER BY submitted_at ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, ManualPharmacyRow>(&sql)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon)
        .fetch_all(pool)
        .await?;

    Ok(within_radius(rows, origin, radius_miles)
        .into_iter()
        .map(|row| row.into_local_candidate(origin))
        .collect())
}

/// Manual pharmacies awaiting review, oldest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_pending_manual_pharmacies(
    pool: &PgPool,
) -> Result<Vec<ManualPharmacyRow>, DbError> {
    let sql = format!(
        "SELECT {MANUAL_COLUMNS} FROM manual_pharmacies \
         WHERE is_approved = FALSE \
         ORDER BY submitted_at ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, ManualPharmacyRow>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Look up one manual pharmacy by its generated id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_manual_pharmacy(
    pool: &PgPool,
    pharmacy_id: &str,
) -> Result<Option<ManualPharmacyRow>, DbError> {
    let sql = format!("SELECT {MANUAL_COLUMNS} FROM manual_pharmacies WHERE pharmacy_id = $1");
    let row = sqlx::query_as::<_, ManualPharmacyRow>(&sql)
        .bind(pharmacy_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}
