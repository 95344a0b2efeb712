//! Row types for the `reports` table.

use chrono::{DateTime, Utc};
use rxlocate_core::{
    distance_miles, CandidateSource, LatLon, LocalCandidate, PharmacyCandidate, Report, ReportType,
};
use uuid::Uuid;

use crate::DbError;

/// Column list shared by every `SELECT` that maps onto [`ReportRow`].
pub(crate) const REPORT_COLUMNS: &str = "id, public_id, pharmacy_id, pharmacy_name, report_type, \
     latitude, longitude, submission_time, street_address, city, state, zip_code, \
     phone_number, standardized_notes, free_text_notes, created_at";

/// A row from the `reports` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: i64,
    pub public_id: Uuid,
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub report_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub submission_time: DateTime<Utc>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: Option<String>,
    pub standardized_notes: Vec<String>,
    pub free_text_notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<ReportRow> for Report {
    type Error = DbError;

    fn try_from(row: ReportRow) -> Result<Self, Self::Error> {
        let report_type = row
            .report_type
            .parse::<ReportType>()
            .map_err(|e| DbError::InvalidRow {
                pharmacy_id: row.pharmacy_id.clone(),
                reason: e.to_string(),
            })?;
        if !LatLon::new(row.latitude, row.longitude).is_valid() {
            return Err(DbError::InvalidRow {
                pharmacy_id: row.pharmacy_id,
                reason: format!("coordinates out of range: ({}, {})", row.latitude, row.longitude),
            });
        }

        Ok(Report {
            pharmacy_id: row.pharmacy_id,
            pharmacy_name: row.pharmacy_name,
            report_type,
            latitude: row.latitude,
            longitude: row.longitude,
            submission_time: row.submission_time,
            street_address: row.street_address,
            city: row.city,
            state: row.state,
            zip_code: row.zip_code,
            phone_number: row.phone_number,
            standardized_notes: row.standardized_notes,
            free_text_notes: row.free_text_notes,
        })
    }
}

/// Convert a batch of rows, failing on the first row that does not convert.
pub(crate) fn rows_into_reports(rows: Vec<ReportRow>) -> Result<Vec<Report>, DbError> {
    rows.into_iter().map(Report::try_from).collect()
}

/// A previously reported pharmacy as a local search candidate, described by
/// its first report.
pub(crate) fn reported_candidate(first: &Report, origin: LatLon) -> LocalCandidate {
    LocalCandidate {
        candidate: PharmacyCandidate {
            name: first.pharmacy_name.clone(),
            full_address: first.full_address(),
            source_id: first.pharmacy_id.clone(),
            source: CandidateSource::Reported,
            distance_miles: Some(distance_miles(origin, first.coords())),
            phone_number: first.phone_number.clone(),
            coords: Some(first.coords()),
        },
        city: Some(first.city.clone()),
        is_manual: false,
        is_approved: true,
    }
}
