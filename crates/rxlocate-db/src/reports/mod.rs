//! Database operations for the append-only `reports` table.

mod read;
mod types;
mod write;

pub use read::{
    list_all_reports, list_reported_pharmacies_nearby, list_reports_between, list_reports_nearby,
};
pub use types::ReportRow;
pub use write::insert_report;
