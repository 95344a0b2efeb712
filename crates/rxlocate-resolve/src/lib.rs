//! Pharmacy identity resolution across search sources.
//!
//! [`matching`] decides whether two candidates denote the same physical
//! pharmacy, [`merge`] folds the authoritative and local candidate streams
//! into one ranked suggestion list, and [`search`] drives both streams
//! concurrently through injected [`cache`] layers, degrading to local-only
//! results when the authoritative provider fails.

pub mod cache;
pub mod matching;
pub mod merge;
pub mod search;

pub use cache::{nearby_cache_key, search_cache_key, Cache, NoopCache, TtlCache};
pub use matching::is_same_location;
pub use merge::{add_pharmacy_entry, matches_query_terms, merge_candidates, MAX_RESULTS};
pub use search::PharmacySearch;
