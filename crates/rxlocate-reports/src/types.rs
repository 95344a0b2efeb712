use chrono::{DateTime, Utc};
use rxlocate_core::{LatLon, Located};
use serde::Serialize;

/// Rolled-up availability of a pharmacy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Denial,
}

impl Status {
    /// Success only when successes strictly outnumber denials; ties are denial.
    #[must_use]
    pub fn from_counts(success_count: u32, denial_count: u32) -> Self {
        if success_count > denial_count {
            Status::Success
        } else {
            Status::Denial
        }
    }
}

/// Direction of reports over the trailing trend window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Neutral,
}

/// Display record for one pharmacy, derived from its full report history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedPharmacy {
    pub id: String,
    pub name: String,
    pub coords: LatLon,
    pub full_address: String,
    pub phone_number: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip: Option<String>,
    pub success_count: u32,
    pub denial_count: u32,
    pub status: Status,
    /// Latest success report; the first-seen report when there is none.
    pub last_updated: DateTime<Utc>,
    pub standardized_notes: Vec<String>,
    pub trend: Trend,
}

impl Located for AggregatedPharmacy {
    fn location(&self) -> Option<LatLon> {
        Some(self.coords)
    }
}
