//! Write operations for the `reports` table.

use rxlocate_core::Report;
use sqlx::PgPool;
use uuid::Uuid;

/// Append one report and return its public id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the insert fails.
pub async fn insert_report(pool: &PgPool, report: &Report) -> Result<Uuid, sqlx::Error> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO reports \
             (pharmacy_id, pharmacy_name, report_type, latitude, longitude, submission_time, \
              street_address, city, state, zip_code, phone_number, standardized_notes, \
              free_text_notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
         RETURNING public_id",
    )
    .bind(&report.pharmacy_id)
    .bind(&report.pharmacy_name)
    .bind(report.report_type.to_string())
    .bind(report.latitude)
    .bind(report.longitude)
    .bind(report.submission_time)
    .bind(&report.street_address)
    .bind(&report.city)
    .bind(&report.state)
    .bind(&report.zip_code)
    .bind(report.phone_number.as_deref())
    .bind(&report.standardized_notes)
    .bind(report.free_text_notes.as_deref())
    .fetch_one(pool)
    .await
}
