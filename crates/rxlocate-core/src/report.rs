//! Anonymous pharmacy reports and the ingestion check that produces them.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geo::{LatLon, Located};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Success,
    Denial,
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportType::Success => write!(f, "success"),
            ReportType::Denial => write!(f, "denial"),
        }
    }
}

impl FromStr for ReportType {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(ReportType::Success),
            "denial" => Ok(ReportType::Denial),
            _ => Err(ReportError::InvalidReportType(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ReportError {
    #[error("report is missing required field `{0}`")]
    MissingField(&'static str),

    #[error("unknown report type '{0}'")]
    InvalidReportType(String),

    #[error("coordinates out of range: ({lat}, {lon})")]
    InvalidCoordinates { lat: f64, lon: f64 },

    #[error("submission time {0} is in the future")]
    InvalidSubmissionTime(DateTime<Utc>),
}

/// One immutable, anonymous submission about a pharmacy.
///
/// Reports are never edited; corrections arrive as new reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Storage key of the pharmacy: an authoritative-source id or a manual id.
    pub pharmacy_id: String,
    pub pharmacy_name: String,
    pub report_type: ReportType,
    pub latitude: f64,
    pub longitude: f64,
    pub submission_time: DateTime<Utc>,
    pub street_address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub phone_number: Option<String>,
    /// Note labels in the submitter's checkbox order.
    pub standardized_notes: Vec<String>,
    pub free_text_notes: Option<String>,
}

impl Report {
    #[must_use]
    pub fn coords(&self) -> LatLon {
        LatLon::new(self.latitude, self.longitude)
    }

    /// One-line address: `street, city, state zip`, skipping empty parts.
    #[must_use]
    pub fn full_address(&self) -> String {
        let state_zip = [self.state.trim(), self.zip_code.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        [self.street_address.trim(), self.city.trim(), state_zip.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }

    #[must_use]
    pub fn has_note(&self, note: &str) -> bool {
        self.standardized_notes.iter().any(|n| n == note)
    }
}

impl Located for Report {
    fn location(&self) -> Option<LatLon> {
        Some(self.coords())
    }
}

/// A report as it arrives from a submission form, before validation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewReport {
    pub pharmacy_id: Option<String>,
    pub pharmacy_name: Option<String>,
    pub report_type: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub submission_time: Option<DateTime<Utc>>,
    pub street_address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default)]
    pub standardized_notes: Vec<String>,
    pub free_text_notes: Option<String>,
}

impl NewReport {
    /// Validate and normalize into a [`Report`].
    ///
    /// `now` stamps the submission time when the submitter did not send one.
    /// Strings are trimmed; blank optional strings and blank note labels are
    /// dropped.
    ///
    /// # Errors
    ///
    /// - [`ReportError::MissingField`] when a required field is absent or blank.
    /// - [`ReportError::InvalidReportType`] for anything but `success`/`denial`.
    /// - [`ReportError::InvalidCoordinates`] for non-finite or out-of-range coordinates.
    /// - [`ReportError::InvalidSubmissionTime`] for a submission time after `now`.
    pub fn validate(self, now: DateTime<Utc>) -> Result<Report, ReportError> {
        let pharmacy_id = required(self.pharmacy_id, "pharmacy_id")?;
        let pharmacy_name = required(self.pharmacy_name, "pharmacy_name")?;
        let report_type = required(self.report_type, "report_type")?.parse::<ReportType>()?;

        let latitude = self.latitude.ok_or(ReportError::MissingField("latitude"))?;
        let longitude = self.longitude.ok_or(ReportError::MissingField("longitude"))?;
        if !LatLon::new(latitude, longitude).is_valid() {
            return Err(ReportError::InvalidCoordinates {
                lat: latitude,
                lon: longitude,
            });
        }

        let submission_time = self.submission_time.unwrap_or(now);
        if submission_time > now {
            return Err(ReportError::InvalidSubmissionTime(submission_time));
        }

        let street_address = required(self.street_address, "street_address")?;
        let city = required(self.city, "city")?;
        let state = required(self.state, "state")?;
        let zip_code = required(self.zip_code, "zip_code")?;

        let standardized_notes = self
            .standardized_notes
            .into_iter()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .collect();

        Ok(Report {
            pharmacy_id,
            pharmacy_name,
            report_type,
            latitude,
            longitude,
            submission_time,
            street_address,
            city,
            state,
            zip_code,
            phone_number: optional(self.phone_number),
            standardized_notes,
            free_text_notes: optional(self.free_text_notes),
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ReportError> {
    optional(value).ok_or(ReportError::MissingField(field))
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn complete() -> NewReport {
        NewReport {
            pharmacy_id: Some("osm:node:42".to_string()),
            pharmacy_name: Some(" CVS Pharmacy ".to_string()),
            report_type: Some("success".to_string()),
            latitude: Some(40.0),
            longitude: Some(-75.0),
            submission_time: None,
            street_address: Some("123 Main St".to_string()),
            city: Some("Springfield".to_string()),
            state: Some("PA".to_string()),
            zip_code: Some("19064".to_string()),
            phone_number: Some("  ".to_string()),
            standardized_notes: vec!["Long wait times".to_string(), " ".to_string()],
            free_text_notes: None,
        }
    }

    #[test]
    fn validate_accepts_complete_report() {
        let report = complete().validate(now()).expect("valid report");
        assert_eq!(report.pharmacy_name, "CVS Pharmacy");
        assert_eq!(report.report_type, ReportType::Success);
        assert_eq!(report.submission_time, now());
        assert_eq!(report.phone_number, None);
        assert_eq!(report.standardized_notes, vec!["Long wait times"]);
    }

    #[test]
    fn validate_keeps_submitted_time() {
        let earlier = now() - chrono::Duration::hours(3);
        let report = NewReport {
            submission_time: Some(earlier),
            ..complete()
        }
        .validate(now())
        .expect("valid report");
        assert_eq!(report.submission_time, earlier);
    }

    #[test]
    fn validate_rejects_future_submission_time() {
        let later = now() + chrono::Duration::days(3650);
        let err = NewReport {
            submission_time: Some(later),
            ..complete()
        }
        .validate(now())
        .unwrap_err();
        assert_eq!(err, ReportError::InvalidSubmissionTime(later));

        let err = NewReport {
            submission_time: Some(now() + chrono::Duration::seconds(1)),
            ..complete()
        }
        .validate(now())
        .unwrap_err();
        assert!(matches!(err, ReportError::InvalidSubmissionTime(_)));
    }

    #[test]
    fn validate_accepts_submission_time_equal_to_now() {
        let report = NewReport {
            submission_time: Some(now()),
            ..complete()
        }
        .validate(now())
        .expect("valid report");
        assert_eq!(report.submission_time, now());
    }

    #[test]
    fn validate_rejects_missing_report_type() {
        let err = NewReport {
            report_type: None,
            ..complete()
        }
        .validate(now())
        .unwrap_err();
        assert_eq!(err, ReportError::MissingField("report_type"));
    }

    #[test]
    fn validate_rejects_unknown_report_type() {
        let err = NewReport {
            report_type: Some("maybe".to_string()),
            ..complete()
        }
        .validate(now())
        .unwrap_err();
        assert!(matches!(err, ReportError::InvalidReportType(ref t) if t == "maybe"));
    }

    #[test]
    fn validate_rejects_blank_pharmacy_id() {
        let err = NewReport {
            pharmacy_id: Some("   ".to_string()),
            ..complete()
        }
        .validate(now())
        .unwrap_err();
        assert_eq!(err, ReportError::MissingField("pharmacy_id"));
    }

    #[test]
    fn validate_rejects_out_of_range_coordinates() {
        let err = NewReport {
            latitude: Some(123.0),
            ..complete()
        }
        .validate(now())
        .unwrap_err();
        assert!(matches!(err, ReportError::InvalidCoordinates { .. }));
    }

    #[test]
    fn report_type_parses_case_insensitively() {
        assert_eq!("Denial".parse::<ReportType>(), Ok(ReportType::Denial));
        assert_eq!(" success ".parse::<ReportType>(), Ok(ReportType::Success));
    }

    #[test]
    fn full_address_joins_parts() {
        let report = complete().validate(now()).expect("valid report");
        assert_eq!(report.full_address(), "123 Main St, Springfield, PA 19064");
    }

    #[test]
    fn new_report_deserializes_without_notes() {
        let json = r#"{"pharmacy_id":"x","report_type":"denial"}"#;
        let parsed: NewReport = serde_json::from_str(json).expect("deserialize");
        assert!(parsed.standardized_notes.is_empty());
        assert_eq!(parsed.report_type.as_deref(), Some("denial"));
    }
}
