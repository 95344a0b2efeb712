//! Write operations for the `manual_pharmacies` table.

use sqlx::PgPool;

use super::types::{ManualPharmacyRow, NewManualPharmacy, MANUAL_COLUMNS};
use crate::DbError;

/// Store a submitted pharmacy as pending review.
///
/// The id is derived from name and address, so a resubmission of an existing
/// entry returns the stored row unchanged (including its review state).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_manual_pharmacy(
    pool: &PgPool,
    pharmacy: &NewManualPharmacy,
) -> Result<ManualPharmacyRow, DbError> {
    // The no-op update makes RETURNING yield the existing row on conflict.
    let sql = format!(
        "INSERT INTO manual_pharmacies \
             (pharmacy_id, name, full_address, city, state, zip_code, phone_number, \
              latitude, longitude) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (pharmacy_id) DO UPDATE SET pharmacy_id = EXCLUDED.pharmacy_id \
         RETURNING {MANUAL_COLUMNS}"
    );
    let row = sqlx::query_as::<_, ManualPharmacyRow>(&sql)
        .bind(&pharmacy.pharmacy_id)
        .bind(&pharmacy.name)
        .bind(&pharmacy.full_address)
        .bind(pharmacy.city.as_deref())
        .bind(pharmacy.state.as_deref())
        .bind(pharmacy.zip_code.as_deref())
        .bind(pharmacy.phone_number.as_deref())
        .bind(pharmacy.latitude)
        .bind(pharmacy.longitude)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Mark a pending manual pharmacy as approved. Approving twice keeps the
/// original approval time.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if no manual pharmacy has `pharmacy_id`, or
/// [`DbError::Sqlx`] if the update fails.
pub async fn approve_manual_pharmacy(pool: &PgPool, pharmacy_id: &str) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE manual_pharmacies \
         SET is_approved = TRUE, approved_at = COALESCE(approved_at, NOW()) \
         WHERE pharmacy_id = $1",
    )
    .bind(pharmacy_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound);
    }
    Ok(())
}
