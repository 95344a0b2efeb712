//! Review queue for manually submitted pharmacies.

use rxlocate_db::{DbError, ManualPharmacyRow};

fn fmt_optional(value: Option<&str>) -> &str {
    value.unwrap_or("\u{2014}")
}

pub(crate) fn format_pending_row(row: &ManualPharmacyRow) -> String {
    format!(
        "{}  {}  {}  ({:.5}, {:.5})  phone: {}  submitted {}",
        row.pharmacy_id,
        row.name,
        row.full_address,
        row.latitude,
        row.longitude,
        fmt_optional(row.phone_number.as_deref()),
        row.submitted_at.format("%Y-%m-%d %H:%M UTC"),
    )
}

/// Print every manual pharmacy awaiting approval, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails.
pub(crate) async fn run_pending(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let rows = rxlocate_db::list_pending_manual_pharmacies(pool).await?;
    if rows.is_empty() {
        println!("no pharmacies awaiting review");
        return Ok(());
    }

    println!("{} pharmacy(ies) awaiting review:", rows.len());
    for row in &rows {
        println!("  {}", format_pending_row(row));
    }
    Ok(())
}

/// Approve one manual pharmacy by id.
///
/// # Errors
///
/// Returns an error if no manual pharmacy has that id or the update fails.
pub(crate) async fn run_approve(pool: &sqlx::PgPool, pharmacy_id: &str) -> anyhow::Result<()> {
    match rxlocate_db::approve_manual_pharmacy(pool, pharmacy_id).await {
        Ok(()) => {
            tracing::info!(pharmacy_id, "manual pharmacy approved");
            println!("approved {pharmacy_id}");
            Ok(())
        }
        Err(DbError::NotFound) => {
            anyhow::bail!("no manual pharmacy with id '{pharmacy_id}'")
        }
        Err(e) => Err(e.into()),
    }
}
