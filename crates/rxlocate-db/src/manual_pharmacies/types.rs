//! Row types for the `manual_pharmacies` table.

use chrono::{DateTime, Utc};
use rxlocate_core::{
    distance_miles, CandidateSource, LatLon, LocalCandidate, Located, PharmacyCandidate,
};
use serde::Serialize;

/// Column list shared by every `SELECT` that maps onto [`ManualPharmacyRow`].
pub(crate) const MANUAL_COLUMNS: &str = "id, pharmacy_id, name, full_address, city, state, \
     zip_code, phone_number, latitude, longitude, is_approved, approved_at, submitted_at";

/// Input record for a user-submitted pharmacy.
#[derive(Debug, Clone)]
pub struct NewManualPharmacy {
    pub pharmacy_id: String,
    pub name: String,
    pub full_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

/// A row from the `manual_pharmacies` table.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ManualPharmacyRow {
    pub id: i64,
    pub pharmacy_id: String,
    pub name: String,
    pub full_address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub is_approved: bool,
    pub approved_at: Option<DateTime<Utc>>,
    pub submitted_at: DateTime<Utc>,
}

impl ManualPharmacyRow {
    #[must_use]
    pub fn coords(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    #[must_use]
    pub fn into_local_candidate(self, origin: LatLon) -> LocalCandidate {
        let coords = self.coords();
        LocalCandidate {
            candidate: PharmacyCandidate {
                name: self.name,
                full_address: self.full_address,
                source_id: self.pharmacy_id,
                source: CandidateSource::Manual,
                distance_miles: Some(distance_miles(origin, coords)),
                phone_number: self.phone_number,
                coords: Some(coords),
            },
            city: self.city,
            is_manual: true,
            is_approved: self.is_approved,
        }
    }
}

impl Located for ManualPharmacyRow {
    fn location(&self) -> Option<LatLon> {
        Some(self.coords())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_row_becomes_pending_manual_candidate() {
        let row = ManualPharmacyRow {
            id: 1,
            pharmacy_id: "manual-0123456789abcdef".to_string(),
            name: "Hometown Drug".to_string(),
            full_address: "5 Elm St, Springfield, PA 19064".to_string(),
            city: Some("Springfield".to_string()),
            state: Some("PA".to_string()),
            zip_code: Some("19064".to_string()),
            phone_number: None,
            latitude: 40.0,
            longitude: -75.0,
            is_approved: false,
            approved_at: None,
            submitted_at: Utc::now(),
        };
        let local = row.into_local_candidate(LatLon::new(40.0, -75.0));
        assert!(local.is_pending_review());
        assert_eq!(local.source(), CandidateSource::Manual);
        assert_eq!(local.candidate.source_id, "manual-0123456789abcdef");
    }
}
