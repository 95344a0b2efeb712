//! Database operations for the `manual_pharmacies` table.

mod read;
mod types;
mod write;

pub use read::{get_manual_pharmacy, list_manual_pharmacies_nearby, list_pending_manual_pharmacies};
pub use types::{ManualPharmacyRow, NewManualPharmacy};
pub use write::{approve_manual_pharmacy, insert_manual_pharmacy};
