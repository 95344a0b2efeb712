use chrono::{DateTime, Duration, Utc};
use rxlocate_core::{Report, ReportType};

use crate::types::Trend;

pub const TREND_WINDOW_DAYS: i64 = 7;

/// Trend over reports submitted strictly after `now - 7 days`.
#[must_use]
pub fn classify_trend<'a, I>(reports: I, now: DateTime<Utc>) -> Trend
where
    I: IntoIterator<Item = &'a Report>,
{
    let window_start = now - Duration::days(TREND_WINDOW_DAYS);
    let (mut successes, mut denials) = (0u32, 0u32);
    for report in reports {
        if report.submission_time <= window_start {
            continue;
        }
        match report.report_type {
            ReportType::Success => successes += 1,
            ReportType::Denial => denials += 1,
        }
    }

    match successes.cmp(&denials) {
        std::cmp::Ordering::Greater => Trend::Up,
        std::cmp::Ordering::Less => Trend::Down,
        std::cmp::Ordering::Equal => Trend::Neutral,
    }
}
