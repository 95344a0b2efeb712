//! Pharmacy search candidates and their source tags.

use serde::{Deserialize, Serialize};

use crate::geo::{LatLon, Located};

/// Where a search candidate came from.
///
/// Declaration order is the merge priority: authoritative results outrank
/// approved manual entries, which outrank previously reported pharmacies.
/// `Action` marks the synthetic "add a pharmacy" entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CandidateSource {
    Authoritative,
    Manual,
    Reported,
    Action,
}

impl CandidateSource {
    /// Sort rank used when ordering merged search results (lower first).
    #[must_use]
    pub fn rank(self) -> u8 {
        match self {
            CandidateSource::Authoritative => 0,
            CandidateSource::Manual => 1,
            CandidateSource::Reported => 2,
            CandidateSource::Action => 3,
        }
    }
}

impl std::fmt::Display for CandidateSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CandidateSource::Authoritative => write!(f, "authoritative"),
            CandidateSource::Manual => write!(f, "manual"),
            CandidateSource::Reported => write!(f, "reported"),
            CandidateSource::Action => write!(f, "action"),
        }
    }
}

/// A search result from one source, before cross-source resolution.
///
/// `source_id` is only unique within its `source`; cross-source identity is
/// decided by location matching, never by comparing ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PharmacyCandidate {
    pub name: String,
    pub full_address: String,
    pub source_id: String,
    pub source: CandidateSource,
    pub distance_miles: Option<f64>,
    pub phone_number: Option<String>,
    pub coords: Option<LatLon>,
}

impl Located for PharmacyCandidate {
    fn location(&self) -> Option<LatLon> {
        self.coords
    }
}

/// A pharmacy held in the project's own store: either a manual entry
/// (pending or approved) or one that already has reports against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalCandidate {
    pub candidate: PharmacyCandidate,
    pub city: Option<String>,
    pub is_manual: bool,
    pub is_approved: bool,
}

impl LocalCandidate {
    /// Source tag this entry carries once it joins a merged result list.
    #[must_use]
    pub fn source(&self) -> CandidateSource {
        if self.is_manual {
            CandidateSource::Manual
        } else {
            CandidateSource::Reported
        }
    }

    /// Manual entries awaiting review never participate in search.
    #[must_use]
    pub fn is_pending_review(&self) -> bool {
        self.is_manual && !self.is_approved
    }
}

impl Located for LocalCandidate {
    fn location(&self) -> Option<LatLon> {
        self.candidate.coords
    }
}

/// Generate a stable id for a manually submitted pharmacy.
///
/// SHA-256 over `name || full_address`, both trimmed and lower-cased, so a
/// resubmission of the same pharmacy maps onto the same id. Hex-encoded and
/// truncated to 16 characters behind a `manual-` prefix.
#[must_use]
pub fn make_manual_pharmacy_id(name: &str, full_address: &str) -> String {
    use sha2::{Digest, Sha256};
    let input = format!(
        "{}\x00{}",
        name.trim().to_lowercase(),
        full_address.trim().to_lowercase()
    );
    let digest = format!("{:x}", Sha256::digest(input.as_bytes()));
    format!("manual-{}", &digest[..16])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local(is_manual: bool, is_approved: bool) -> LocalCandidate {
        LocalCandidate {
            candidate: PharmacyCandidate {
                name: "Main Street Drug".to_string(),
                full_address: "12 Main St, Springfield, IL 62701".to_string(),
                source_id: "manual-abc".to_string(),
                source: CandidateSource::Manual,
                distance_miles: None,
                phone_number: None,
                coords: None,
            },
            city: Some("Springfield".to_string()),
            is_manual,
            is_approved,
        }
    }

    #[test]
    fn source_rank_follows_priority() {
        assert!(CandidateSource::Authoritative.rank() < CandidateSource::Manual.rank());
        assert!(CandidateSource::Manual.rank() < CandidateSource::Reported.rank());
        assert!(CandidateSource::Reported.rank() < CandidateSource::Action.rank());
    }

    #[test]
    fn source_serializes_lowercase() {
        let json = serde_json::to_string(&CandidateSource::Authoritative).expect("serialize");
        assert_eq!(json, "\"authoritative\"");
    }

    #[test]
    fn local_candidate_source_tag() {
        assert_eq!(local(true, true).source(), CandidateSource::Manual);
        assert_eq!(local(false, true).source(), CandidateSource::Reported);
    }

    #[test]
    fn only_unapproved_manual_entries_are_pending() {
        assert!(local(true, false).is_pending_review());
        assert!(!local(true, true).is_pending_review());
        assert!(!local(false, false).is_pending_review());
    }

    #[test]
    fn manual_id_is_stable_and_case_insensitive() {
        let a = make_manual_pharmacy_id("Main Street Drug", "12 Main St");
        let b = make_manual_pharmacy_id("  main street drug ", "12 MAIN ST");
        assert_eq!(a, b);
        assert!(a.starts_with("manual-"));
        assert_eq!(a.len(), "manual-".len() + 16);
    }

    #[test]
    fn manual_id_differs_by_address() {
        let a = make_manual_pharmacy_id("Main Street Drug", "12 Main St");
        let b = make_manual_pharmacy_id("Main Street Drug", "14 Main St");
        assert_ne!(a, b);
    }
}
