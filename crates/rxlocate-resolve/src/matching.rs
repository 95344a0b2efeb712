//! Fuzzy same-pharmacy test across sources.
//!
//! Ids never agree across sources, so identity is inferred from name and
//! address text. Both must agree: a missed match only shows a near-duplicate,
//! while a false match silently hides a different pharmacy.

use std::sync::LazyLock;

use regex::Regex;
use rxlocate_core::PharmacyCandidate;

static LEADING_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+").expect("valid regex"));

/// Minimum length (exclusive) of a name contained in the other name.
const MIN_CONTAINED_NAME_LEN: usize = 3;

/// Same-index character agreement required between normalized addresses.
const ADDRESS_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Words that describe the business type rather than the pharmacy itself.
const GENERIC_NAME_WORDS: &[&str] = &["pharmacy", "pharmacies"];

/// Whether two candidates from different sources denote the same pharmacy.
#[must_use]
pub fn is_same_location(a: &PharmacyCandidate, b: &PharmacyCandidate) -> bool {
    if !names_match(&a.name, &b.name) {
        return false;
    }

    if let (Some(num_a), Some(num_b)) = (
        leading_street_number(&a.full_address),
        leading_street_number(&b.full_address),
    ) {
        if num_a == num_b {
            return true;
        }
    }

    address_similarity(&normalize(&a.full_address), &normalize(&b.full_address))
        > ADDRESS_SIMILARITY_THRESHOLD
}

/// Lower-case and strip every non-alphanumeric character.
pub(crate) fn normalize(s: &str) -> String {
    s.to_lowercase()
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

/// Normalized name with trailing generic business-type words removed.
fn name_core(s: &str) -> String {
    let lower = s.to_lowercase();
    let mut words: Vec<&str> = lower
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    while words.last().is_some_and(|w| GENERIC_NAME_WORDS.contains(w)) {
        words.pop();
    }
    words.concat()
}

fn names_match(a: &str, b: &str) -> bool {
    let (norm_a, norm_b) = (normalize(a), normalize(b));
    if norm_a == norm_b {
        return true;
    }

    let contains = |outer: &str, inner: &str| {
        inner.len() > MIN_CONTAINED_NAME_LEN && outer.contains(inner)
    };
    if contains(&norm_a, &norm_b) || contains(&norm_b, &norm_a) {
        return true;
    }

    // "CVS" and "CVS Pharmacy" name the same business even though "cvs" is
    // too short for the containment rule.
    let (core_a, core_b) = (name_core(a), name_core(b));
    !core_a.is_empty() && core_a == core_b
}

fn leading_street_number(address: &str) -> Option<&str> {
    LEADING_NUMBER_RE
        .find(address.trim_start())
        .map(|m| m.as_str())
}

/// Fraction of positions where both strings hold the same character,
/// relative to the longer string. Order- and length-sensitive by design of
/// the tuned threshold; this is not an edit distance.
// Address lengths are far below f64's exact-integer range.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn address_similarity(a: &str, b: &str) -> f64 {
    let longest = a.len().max(b.len());
    if longest == 0 {
        return 0.0;
    }
    let same = a
        .bytes()
        .zip(b.bytes())
        .filter(|(x, y)| x == y)
        .count();
    same as f64 / longest as f64
}

#[cfg(test)]
mod tests {
    use rxlocate_core::CandidateSource;

    use super::*;

    fn candidate(name: &str, address: &str) -> PharmacyCandidate {
        PharmacyCandidate {
            name: name.to_string(),
            full_address: address.to_string(),
            source_id: format!("id-{name}"),
            source: CandidateSource::Authoritative,
            distance_miles: None,
            phone_number: None,
            coords: None,
        }
    }

    #[test]
    fn brand_name_with_and_without_suffix_and_same_number_match() {
        assert!(is_same_location(
            &candidate("CVS Pharmacy", "123 Main St"),
            &candidate("CVS", "123 Main Street"),
        ));
    }

    #[test]
    fn reordered_short_names_do_not_match() {
        assert!(!names_match("CVS Pharmacy", "Pharmacy CVS"));
        assert!(!is_same_location(
            &candidate("CVS Pharmacy", "123 Main St"),
            &candidate("Pharmacy CVS", "123 Main St"),
        ));
    }

    #[test]
    fn only_trailing_generic_words_are_dropped() {
        assert_eq!(name_core("CVS Pharmacy"), "cvs");
        assert_eq!(name_core("Hometown Pharmacies"), "hometown");
        assert_eq!(name_core("Pharmacy CVS"), "pharmacycvs");
    }

    #[test]
    fn different_names_never_match() {
        assert!(!is_same_location(
            &candidate("CVS", "123 Main St"),
            &candidate("Walgreens", "456 Oak Ave"),
        ));
        assert!(!is_same_location(
            &candidate("CVS", "123 Main St"),
            &candidate("Walgreens", "123 Main St"),
        ));
    }

    #[test]
    fn contained_name_longer_than_three_chars_matches() {
        assert!(is_same_location(
            &candidate("Walgreens", "900 Elm St"),
            &candidate("Walgreens #4411", "900 Elm Street"),
        ));
    }

    #[test]
    fn short_contained_name_does_not_satisfy_containment() {
        // "abc" is inside "abcmart" but is only three characters long.
        assert!(!names_match("ABC", "ABC Mart"));
        assert!(names_match("ABC", "a.b.c."));
    }

    #[test]
    fn different_street_numbers_fall_through_to_similarity() {
        // Same name, different numbers, very different addresses.
        assert!(!is_same_location(
            &candidate("Rite Aid", "10 Pine Rd"),
            &candidate("Rite Aid", "2500 Market Boulevard"),
        ));
    }

    #[test]
    fn addresses_without_numbers_use_character_overlap() {
        assert!(is_same_location(
            &candidate("Hometown Drug", "Main Street Plaza"),
            &candidate("Hometown Drug", "Main Street Plaza."),
        ));
        assert!(!is_same_location(
            &candidate("Hometown Drug", "Main Street Plaza"),
            &candidate("Hometown Drug", "Plaza on Main"),
        ));
    }

    #[test]
    fn similarity_is_position_based() {
        assert!((address_similarity("abcd", "abcd") - 1.0).abs() < f64::EPSILON);
        assert!((address_similarity("abcd", "abxd") - 0.75).abs() < f64::EPSILON);
        // A one-character shift destroys the overlap.
        assert!(address_similarity("abcd", "xabcd") < 0.5);
        assert_eq!(address_similarity("", ""), 0.0);
    }

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize("St. Mary's Rx #2"), "stmarysrx2");
    }

    #[test]
    fn leading_number_ignores_leading_whitespace() {
        assert_eq!(leading_street_number("  42 Oak Ave"), Some("42"));
        assert_eq!(leading_street_number("Suite 42"), None);
    }
}
