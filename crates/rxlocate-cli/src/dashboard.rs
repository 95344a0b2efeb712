//! Batch aggregation: the dashboard view rendered as JSON on stdout.

use chrono::{DateTime, Utc};
use rxlocate_core::ReportStore;
use rxlocate_db::PgStore;
use rxlocate_reports::{aggregate, summarize, AggregatedPharmacy, DashboardSummary};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub(crate) struct DashboardOutput {
    pub generated_at: DateTime<Utc>,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub summary: DashboardSummary,
    pub pharmacies: Vec<AggregatedPharmacy>,
}

/// Aggregate every report, or only those in `[start, end)`, and print the
/// result as pretty JSON.
///
/// # Errors
///
/// Returns an error if the reports cannot be read or any stored row is
/// invalid.
pub(crate) async fn run_dashboard(
    pool: &sqlx::PgPool,
    timeframe: Option<(DateTime<Utc>, DateTime<Utc>)>,
) -> anyhow::Result<()> {
    if let Some((start, end)) = timeframe {
        anyhow::ensure!(start < end, "--start must be before --end");
    }

    let store = PgStore::new(pool.clone());
    let reports = match timeframe {
        Some((start, end)) => store.query_by_timeframe(start, end).await?,
        None => store.query_all().await?,
    };
    tracing::info!(reports = reports.len(), "aggregating reports");

    let output = build_output(&reports, timeframe, Utc::now());
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub(crate) fn build_output(
    reports: &[rxlocate_core::Report],
    timeframe: Option<(DateTime<Utc>, DateTime<Utc>)>,
    now: DateTime<Utc>,
) -> DashboardOutput {
    let aggregated = aggregate(reports, now);
    DashboardOutput {
        generated_at: now,
        start: timeframe.map(|(start, _)| start),
        end: timeframe.map(|(_, end)| end),
        summary: summarize(&aggregated),
        pharmacies: aggregated.into_values().collect(),
    }
}
