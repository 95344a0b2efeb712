//! Note history compaction.
//!
//! Each distinct note label survives once, from its most recent report. The
//! stock-out label is never shown verbatim; it is folded together with any
//! later success into a single stock-status line that always comes first.

use chrono::{DateTime, Utc};
use rxlocate_core::{Report, ReportType};

pub const STOCK_OUT_NOTE: &str = "Will order, but not in stock";
pub const LONG_WAIT_TIMES: &str = "Long wait times";
pub const BEST_TO_CALL_AHEAD: &str = "Best to call ahead";

/// Labels that carry their age when older than today.
const TIME_SENSITIVE_NOTES: [&str; 2] = [LONG_WAIT_TIMES, BEST_TO_CALL_AHEAD];

/// Display notes for one pharmacy's reports, in any input order.
#[must_use]
pub fn compact_notes(reports: &[&Report], now: DateTime<Utc>) -> Vec<String> {
    let mut newest_first: Vec<&Report> = reports.to_vec();
    newest_first.sort_by(|a, b| b.submission_time.cmp(&a.submission_time));

    let mut notes = Vec::new();
    if let Some(stock) = stock_status_note(&newest_first, now) {
        notes.push(stock);
    }

    let mut seen: Vec<&str> = Vec::new();
    for report in &newest_first {
        for note in &report.standardized_notes {
            let note = note.as_str();
            if note == STOCK_OUT_NOTE || seen.contains(&note) {
                continue;
            }
            seen.push(note);

            let age = days_since(report.submission_time, now);
            if TIME_SENSITIVE_NOTES.contains(&note) && age > 0 {
                notes.push(format!("{note} ({age} days ago)"));
            } else {
                notes.push(note.to_string());
            }
        }
    }
    notes
}

fn stock_status_note(newest_first: &[&Report], now: DateTime<Utc>) -> Option<String> {
    let stock_out = newest_first.iter().find(|r| r.has_note(STOCK_OUT_NOTE))?;
    let out_days = days_since(stock_out.submission_time, now);

    let restocked = newest_first.iter().find(|r| {
        r.report_type == ReportType::Success && r.submission_time > stock_out.submission_time
    });

    Some(match restocked {
        Some(r) => format!(
            "Back in stock {} days ago (previously out of stock {out_days} days ago)",
            days_since(r.submission_time, now)
        ),
        None => format!("Out of stock, reported {}", out_of_stock_age(out_days)),
    })
}

fn out_of_stock_age(days: i64) -> String {
    match days {
        0 => "today".to_string(),
        1 => "yesterday".to_string(),
        2..=7 => format!("{days} days ago"),
        _ => format!("{} weeks ago", days / 7),
    }
}

/// Whole days elapsed, floored; future timestamps count as today.
fn days_since(ts: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - ts).num_days().max(0)
}
