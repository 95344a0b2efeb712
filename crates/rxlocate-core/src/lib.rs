//! Shared domain types for rxlocate.
//!
//! Holds the pharmacy/report data model, the distance primitives used by both
//! the search and aggregation pipelines, the boundary traits implemented by
//! the store and provider crates, and environment configuration.

pub mod app_config;
pub mod boundary;
pub mod config;
pub mod geo;
pub mod pharmacy;
pub mod report;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use boundary::{AddressGeocoder, AddressValidation, LocalEntryStore, MapSearchProvider, ReportStore};
pub use config::{load_app_config, load_app_config_from_env};
pub use geo::{
    bounding_box, distance_miles, sort_by_distance, within_radius, BoundingBox, LatLon, Located,
    DISPLAY_RADIUS_MILES, PROVIDER_SEARCH_RADIUS_KM, PROVIDER_SEARCH_RADIUS_MILES,
    REPORT_SEARCH_RADIUS_MILES,
};
pub use pharmacy::{make_manual_pharmacy_id, CandidateSource, LocalCandidate, PharmacyCandidate};
pub use report::{NewReport, Report, ReportError, ReportType};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
