use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rxlocate_core::{sort_by_distance, LatLon, Report, ReportType};

use crate::notes::compact_notes;
use crate::trend::classify_trend;
use crate::types::{AggregatedPharmacy, Status};

/// Fold `reports` into one [`AggregatedPharmacy`] per pharmacy id.
///
/// Identity metadata (name, address, phone, coordinates) comes from the first
/// report of each group in input order. The map is ordered by id, so the same
/// `(reports, now)` always serializes identically.
#[must_use]
pub fn aggregate(reports: &[Report], now: DateTime<Utc>) -> BTreeMap<String, AggregatedPharmacy> {
    let mut groups: BTreeMap<&str, Vec<&Report>> = BTreeMap::new();
    for report in reports {
        groups
            .entry(report.pharmacy_id.as_str())
            .or_default()
            .push(report);
    }

    groups
        .into_iter()
        .filter_map(|(id, group)| {
            aggregate_group(&group, now).map(|pharmacy| (id.to_string(), pharmacy))
        })
        .collect()
}

/// Aggregated pharmacies ordered by distance from `origin`, nearest first.
#[must_use]
pub fn nearest_first(
    aggregated: BTreeMap<String, AggregatedPharmacy>,
    origin: LatLon,
) -> Vec<AggregatedPharmacy> {
    let mut list: Vec<AggregatedPharmacy> = aggregated.into_values().collect();
    sort_by_distance(&mut list, origin);
    list
}

fn aggregate_group(group: &[&Report], now: DateTime<Utc>) -> Option<AggregatedPharmacy> {
    let first = *group.first()?;

    let (mut success_count, mut denial_count) = (0u32, 0u32);
    let mut last_success: Option<DateTime<Utc>> = None;
    for report in group {
        match report.report_type {
            ReportType::Success => {
                success_count += 1;
                last_success = Some(
                    last_success.map_or(report.submission_time, |t| t.max(report.submission_time)),
                );
            }
            ReportType::Denial => denial_count += 1,
        }
    }

    Some(AggregatedPharmacy {
        id: first.pharmacy_id.clone(),
        name: first.pharmacy_name.clone(),
        coords: first.coords(),
        full_address: first.full_address(),
        phone_number: first.phone_number.clone(),
        city: non_empty(&first.city),
        state: non_empty(&first.state),
        zip: non_empty(&first.zip_code),
        success_count,
        denial_count,
        status: Status::from_counts(success_count, denial_count),
        last_updated: last_success.unwrap_or(first.submission_time),
        standardized_notes: compact_notes(group, now),
        trend: classify_trend(group.iter().copied(), now),
    })
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

#[cfg(test)]
#[path = "aggregate_test.rs"]
mod tests;
