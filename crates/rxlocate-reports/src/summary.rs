use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::AggregatedPharmacy;

/// Dashboard totals over an aggregated report slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSummary {
    pub total_pharmacies: usize,
    pub success_reports: u64,
    pub denial_reports: u64,
}

#[must_use]
pub fn summarize(aggregated: &BTreeMap<String, AggregatedPharmacy>) -> DashboardSummary {
    aggregated
        .values()
        .fold(DashboardSummary::default(), |mut acc, p| {
            acc.total_pharmacies += 1;
            acc.success_reports += u64::from(p.success_count);
            acc.denial_reports += u64::from(p.denial_count);
            acc
        })
}
