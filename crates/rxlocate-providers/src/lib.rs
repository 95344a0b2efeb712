//! HTTP-backed boundary adapters.
//!
//! [`NominatimClient`] answers both the authoritative pharmacy search and the
//! address validation used by manual submissions, against the Nominatim JSON
//! API (or any server speaking the same `/search` dialect).

pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::{NominatimClient, NominatimConfig};
pub use error::ProviderError;
