//! [`PgStore`]: the Postgres implementation of the report and local-entry
//! boundaries.

use chrono::{DateTime, Utc};
use rxlocate_core::{LatLon, LocalCandidate, LocalEntryStore, Report, ReportStore};
use sqlx::PgPool;

use crate::manual_pharmacies::list_manual_pharmacies_nearby;
use crate::reports::{
    insert_report, list_all_reports, list_reported_pharmacies_nearby, list_reports_between,
    list_reports_nearby,
};
use crate::DbError;

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl ReportStore for PgStore {
    type Error = DbError;

    async fn query_nearby(&self, origin: LatLon, radius_miles: f64) -> Result<Vec<Report>, DbError> {
        list_reports_nearby(&self.pool, origin, radius_miles).await
    }

    async fn query_all(&self) -> Result<Vec<Report>, DbError> {
        list_all_reports(&self.pool).await
    }

    async fn query_by_timeframe(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Report>, DbError> {
        list_reports_between(&self.pool, start, end).await
    }

    async fn append(&self, report: &Report) -> Result<(), DbError> {
        let public_id = insert_report(&self.pool, report).await?;
        tracing::info!(
            %public_id,
            pharmacy_id = %report.pharmacy_id,
            report_type = %report.report_type,
            "report stored"
        );
        Ok(())
    }
}

impl LocalEntryStore for PgStore {
    type Error = DbError;

    /// Manual entries (approved and pending) first, then reported pharmacies.
    async fn query_nearby(
        &self,
        origin: LatLon,
        radius_miles: f64,
    ) -> Result<Vec<LocalCandidate>, DbError> {
        let mut entries = list_manual_pharmacies_nearby(&self.pool, origin, radius_miles).await?;
        entries.extend(list_reported_pharmacies_nearby(&self.pool, origin, radius_miles).await?);
        Ok(entries)
    }
}
