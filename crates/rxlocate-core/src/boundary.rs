//! Boundary contracts between the pure core and its external collaborators.
//!
//! The store crate implements [`ReportStore`] and [`LocalEntryStore`]; the
//! provider crate implements [`MapSearchProvider`] and [`AddressGeocoder`].
//! Every future is `Send` so implementations can be driven from axum handlers.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::geo::LatLon;
use crate::pharmacy::{LocalCandidate, PharmacyCandidate};
use crate::report::Report;

/// Authoritative points-of-interest search.
pub trait MapSearchProvider: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Candidates near `origin`, already distance-filtered and in relevance order.
    fn search(
        &self,
        query: &str,
        origin: LatLon,
    ) -> impl Future<Output = Result<Vec<PharmacyCandidate>, Self::Error>> + Send;
}

/// Previously reported and manually submitted pharmacies.
pub trait LocalEntryStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn query_nearby(
        &self,
        origin: LatLon,
        radius_miles: f64,
    ) -> impl Future<Output = Result<Vec<LocalCandidate>, Self::Error>> + Send;
}

/// Durable, append-only report storage.
pub trait ReportStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every report within `radius_miles` of `origin`, in no particular order.
    fn query_nearby(
        &self,
        origin: LatLon,
        radius_miles: f64,
    ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send;

    fn query_all(&self) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send;

    /// Reports submitted in `[start, end)`.
    fn query_by_timeframe(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<Report>, Self::Error>> + Send;

    fn append(&self, report: &Report) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

/// Outcome of checking a free-text address against a geocoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddressValidation {
    pub valid: bool,
    pub coordinates: Option<LatLon>,
    pub normalized_address: Option<String>,
}

impl AddressValidation {
    #[must_use]
    pub fn invalid() -> Self {
        Self {
            valid: false,
            coordinates: None,
            normalized_address: None,
        }
    }
}

/// Address validation used by the manual-entry submission path.
pub trait AddressGeocoder: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn validate(
        &self,
        address: &str,
    ) -> impl Future<Output = Result<AddressValidation, Self::Error>> + Send;
}
