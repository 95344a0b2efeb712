//! Folds the authoritative and local candidate streams into one ranked,
//! deduplicated suggestion list.

use std::cmp::Ordering;

use rxlocate_core::{distance_miles, CandidateSource, LatLon, LocalCandidate, PharmacyCandidate};

use crate::matching::is_same_location;

/// Suggestions returned before the trailing "add a pharmacy" entry.
pub const MAX_RESULTS: usize = 5;

pub const ADD_PHARMACY_SOURCE_ID: &str = "add-pharmacy";
pub const ADD_PHARMACY_NAME: &str = "Add a pharmacy not listed";

/// The synthetic entry that closes every suggestion list.
#[must_use]
pub fn add_pharmacy_entry() -> PharmacyCandidate {
    PharmacyCandidate {
        name: ADD_PHARMACY_NAME.to_string(),
        full_address: String::new(),
        source_id: ADD_PHARMACY_SOURCE_ID.to_string(),
        source: CandidateSource::Action,
        distance_miles: None,
        phone_number: None,
        coords: None,
    }
}

/// Whether every whitespace-separated query term appears in the entry's
/// name, address or city (case-insensitive). A blank query matches all.
#[must_use]
pub fn matches_query_terms(entry: &LocalCandidate, query: &str) -> bool {
    let haystack = format!(
        "{} {} {}",
        entry.candidate.name,
        entry.candidate.full_address,
        entry.city.as_deref().unwrap_or_default()
    )
    .to_lowercase();

    query
        .split_whitespace()
        .all(|term| haystack.contains(&term.to_lowercase()))
}

/// Merge both streams for `query` around `origin`.
///
/// The authoritative list keeps its relevance order as the starting point.
/// Local entries that are pending review or do not match the query are
/// dropped; the rest are added only when no entry already in the list is the
/// same location. Approved manual entries go before the first reported
/// entry, reported entries go last. The list is then ordered by exact name
/// match, source rank and distance, cut to [`MAX_RESULTS`], and closed with
/// [`add_pharmacy_entry`].
///
/// The output depends only on the two inputs, never on which stream arrived
/// first.
#[must_use]
pub fn merge_candidates(
    authoritative: Vec<PharmacyCandidate>,
    local: Vec<LocalCandidate>,
    query: &str,
    origin: LatLon,
) -> Vec<PharmacyCandidate> {
    let mut merged: Vec<PharmacyCandidate> = authoritative
        .into_iter()
        .map(|c| PharmacyCandidate {
            source: CandidateSource::Authoritative,
            ..c
        })
        .collect();

    for entry in local {
        if entry.is_pending_review() || !matches_query_terms(&entry, query) {
            continue;
        }
        let source = entry.source();
        let candidate = PharmacyCandidate {
            source,
            ..entry.candidate
        };
        if merged.iter().any(|m| is_same_location(m, &candidate)) {
            continue;
        }
        match source {
            CandidateSource::Manual => {
                let at = merged
                    .iter()
                    .position(|m| m.source == CandidateSource::Reported)
                    .unwrap_or(merged.len());
                merged.insert(at, candidate);
            }
            _ => merged.push(candidate),
        }
    }

    for candidate in &mut merged {
        if let Some(coords) = candidate.coords {
            candidate.distance_miles = Some(distance_miles(origin, coords));
        }
    }

    let wanted = query.trim().to_lowercase();
    merged.sort_by(|a, b| compare(a, b, &wanted));
    merged.truncate(MAX_RESULTS);
    merged.push(add_pharmacy_entry());
    merged
}

fn compare(a: &PharmacyCandidate, b: &PharmacyCandidate, wanted: &str) -> Ordering {
    let exact = |c: &PharmacyCandidate| !wanted.is_empty() && c.name.trim().to_lowercase() == wanted;
    exact(b)
        .cmp(&exact(a))
        .then_with(|| a.source.rank().cmp(&b.source.rank()))
        .then_with(|| sort_distance(a).total_cmp(&sort_distance(b)))
}

fn sort_distance(c: &PharmacyCandidate) -> f64 {
    c.distance_miles.unwrap_or(f64::INFINITY)
}
