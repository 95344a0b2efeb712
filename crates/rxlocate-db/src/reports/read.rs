//! Read operations for the `reports` table.
//!
//! Every query orders by `submission_time, id`, so the first report of a
//! pharmacy in the returned list is its earliest one.

use chrono::{DateTime, Utc};
use rxlocate_core::{bounding_box, within_radius, LatLon, LocalCandidate, Report};
use sqlx::PgPool;

use super::types::{reported_candidate, rows_into_reports, ReportRow, REPORT_COLUMNS};
use crate::DbError;

/// Every report within `radius_miles` of `origin`.
///
/// Rows are pre-filtered with a bounding box in SQL, then trimmed to the
/// exact haversine radius.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if any row cannot be converted.
pub async fn list_reports_nearby(
    pool: &PgPool,
    origin: LatLon,
    radius_miles: f64,
) -> Result<Vec<Report>, DbError> {
    let bbox = bounding_box(origin, radius_miles);
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports \
         WHERE latitude BETWEEN $1 AND $2 \
           AND longitude BETWEEN $3 AND $4 \
         ORDER BY submission_time ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, ReportRow>(&sql)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon)
        .fetch_all(pool)
        .await?;

    let reports = rows_into_reports(rows)?;
    Ok(within_radius(reports, origin, radius_miles))
}

/// Every stored report.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if any row cannot be converted.
pub async fn list_all_reports(pool: &PgPool) -> Result<Vec<Report>, DbError> {
    let sql = format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY submission_time ASC, id ASC");
    let rows = sqlx::query_as::<_, ReportRow>(&sql)
        .fetch_all(pool)
        .await?;
    rows_into_reports(rows)
}

/// Reports submitted in `[start, end)`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if any row cannot be converted.
pub async fn list_reports_between(
    pool: &PgPool,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<Vec<Report>, DbError> {
    let sql = format!(
        "SELECT {REPORT_COLUMNS} FROM reports \
         WHERE submission_time >= $1 AND submission_time < $2 \
         ORDER BY submission_time ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, ReportRow>(&sql)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;
    rows_into_reports(rows)
}

/// Distinct reported pharmacies within `radius_miles` of `origin`, each
/// described by its earliest report.
///
/// Pharmacies that exist as manual entries are left out; those come from
/// [`crate::list_manual_pharmacies_nearby`] with their review state.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails, or [`DbError::InvalidRow`]
/// if any row cannot be converted.
pub async fn list_reported_pharmacies_nearby(
    pool: &PgPool,
    origin: LatLon,
    radius_miles: f64,
) -> Result<Vec<LocalCandidate>, DbError> {
    let bbox = bounding_box(origin, radius_miles);
    let sql = format!(
        "SELECT DISTINCT ON (pharmacy_id) {REPORT_COLUMNS} FROM reports r \
         WHERE latitude BETWEEN $1 AND $2 \
           AND longitude BETWEEN $3 AND $4 \
           AND NOT EXISTS (\
               SELECT 1 FROM manual_pharmacies m WHERE m.pharmacy_id = r.pharmacy_id\
           ) \
         ORDER BY pharmacy_id, submission_time ASC, id ASC"
    );
    let rows = sqlx::query_as::<_, ReportRow>(&sql)
        .bind(bbox.min_lat)
        .bind(bbox.max_lat)
        .bind(bbox.min_lon)
        .bind(bbox.max_lon)
        .fetch_all(pool)
        .await?;

    let firsts = within_radius(rows_into_reports(rows)?, origin, radius_miles);
    Ok(firsts
        .iter()
        .map(|report| reported_candidate(report, origin))
        .collect())
}
