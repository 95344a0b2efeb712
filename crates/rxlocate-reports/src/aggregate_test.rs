use chrono::{Duration, TimeZone};
use rxlocate_core::{LatLon, Report, ReportType};

use super::*;
use crate::notes::STOCK_OUT_NOTE;
use crate::summary::summarize;
use crate::types::Trend;

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

fn report(id: &str, kind: ReportType, age: Duration) -> Report {
    Report {
        pharmacy_id: id.to_string(),
        pharmacy_name: format!("Pharmacy {id}"),
        report_type: kind,
        latitude: 40.0,
        longitude: -75.0,
        submission_time: now() - age,
        street_address: "5 Elm St".to_string(),
        city: "Springfield".to_string(),
        state: "PA".to_string(),
        zip_code: "19064".to_string(),
        phone_number: Some("555-0100".to_string()),
        standardized_notes: Vec::new(),
        free_text_notes: None,
    }
}

fn with_notes(mut r: Report, notes: &[&str]) -> Report {
    r.standardized_notes = notes.iter().map(ToString::to_string).collect();
    r
}

#[test]
fn groups_by_pharmacy_id() {
    let reports = vec![
        report("a", ReportType::Success, Duration::days(1)),
        report("b", ReportType::Denial, Duration::days(1)),
        report("a", ReportType::Denial, Duration::days(2)),
    ];
    let out = aggregate(&reports, now());
    assert_eq!(out.len(), 2);
    assert_eq!(out["a"].success_count, 1);
    assert_eq!(out["a"].denial_count, 1);
    assert_eq!(out["b"].denial_count, 1);
}

#[test]
fn empty_input_yields_empty_map() {
    assert!(aggregate(&[], now()).is_empty());
}

#[test]
fn status_is_success_only_when_successes_outnumber_denials() {
    let mut reports = vec![
        report("tie", ReportType::Success, Duration::days(1)),
        report("tie", ReportType::Success, Duration::days(2)),
        report("tie", ReportType::Denial, Duration::days(3)),
        report("tie", ReportType::Denial, Duration::days(4)),
    ];
    reports.push(report("win", ReportType::Success, Duration::days(1)));
    reports.push(report("lose", ReportType::Denial, Duration::days(1)));

    let out = aggregate(&reports, now());
    assert_eq!(out["tie"].status, Status::Denial);
    assert_eq!(out["win"].status, Status::Success);
    assert_eq!(out["lose"].status, Status::Denial);
}

#[test]
fn last_updated_is_latest_success() {
    let reports = vec![
        report("a", ReportType::Success, Duration::days(5)),
        report("a", ReportType::Success, Duration::days(2)),
        report("a", ReportType::Denial, Duration::hours(1)),
    ];
    let out = aggregate(&reports, now());
    assert_eq!(out["a"].last_updated, now() - Duration::days(2));
}

#[test]
fn last_updated_without_successes_is_first_seen_report() {
    let reports = vec![
        report("a", ReportType::Denial, Duration::days(5)),
        report("a", ReportType::Denial, Duration::days(1)),
    ];
    let out = aggregate(&reports, now());
    assert_eq!(out["a"].last_updated, now() - Duration::days(5));
}

#[test]
fn trend_counts_only_the_trailing_seven_days() {
    let just_outside = Duration::days(7) + Duration::seconds(1);
    let reports = vec![
        report("a", ReportType::Success, just_outside),
        report("a", ReportType::Success, just_outside),
        report("a", ReportType::Denial, Duration::seconds(1)),
    ];
    let out = aggregate(&reports, now());
    assert_eq!(out["a"].trend, Trend::Down);
    // Overall status still reflects every report.
    assert_eq!(out["a"].status, Status::Success);
}

#[test]
fn trend_boundary_is_exclusive() {
    let reports = vec![report("a", ReportType::Success, Duration::days(7))];
    assert_eq!(aggregate(&reports, now())["a"].trend, Trend::Neutral);
}

#[test]
fn trend_is_up_and_neutral_on_balance() {
    let reports = vec![
        report("up", ReportType::Success, Duration::days(1)),
        report("even", ReportType::Success, Duration::days(1)),
        report("even", ReportType::Denial, Duration::days(2)),
    ];
    let out = aggregate(&reports, now());
    assert_eq!(out["up"].trend, Trend::Up);
    assert_eq!(out["even"].trend, Trend::Neutral);
}

#[test]
fn metadata_comes_from_first_report_in_input_order() {
    let mut later = report("a", ReportType::Success, Duration::hours(1));
    later.pharmacy_name = "Renamed".to_string();
    later.phone_number = None;
    let reports = vec![report("a", ReportType::Denial, Duration::days(3)), later];

    let out = aggregate(&reports, now());
    let a = &out["a"];
    assert_eq!(a.name, "Pharmacy a");
    assert_eq!(a.phone_number.as_deref(), Some("555-0100"));
    assert_eq!(a.full_address, "5 Elm St, Springfield, PA 19064");
    assert_eq!(a.city.as_deref(), Some("Springfield"));
    assert_eq!(a.zip.as_deref(), Some("19064"));
}

#[test]
fn restock_after_stock_out_is_reported_as_back_in_stock() {
    let reports = vec![
        report("a", ReportType::Success, Duration::days(9)),
        with_notes(report("a", ReportType::Denial, Duration::days(5)), &[STOCK_OUT_NOTE]),
        report("a", ReportType::Success, Duration::days(1)),
    ];
    let out = aggregate(&reports, now());
    let first = &out["a"].standardized_notes[0];
    assert!(first.starts_with("Back in stock"), "got {first}");
}

#[test]
fn aggregation_is_deterministic() {
    let reports = vec![
        with_notes(report("b", ReportType::Denial, Duration::days(2)), &["Long wait times"]),
        report("a", ReportType::Success, Duration::days(1)),
        with_notes(report("b", ReportType::Success, Duration::days(1)), &[STOCK_OUT_NOTE]),
    ];
    let first = serde_json::to_string(&aggregate(&reports, now())).expect("serialize");
    let second = serde_json::to_string(&aggregate(&reports, now())).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn nearest_first_orders_by_distance() {
    let mut far = report("far", ReportType::Success, Duration::days(1));
    far.latitude = 40.5;
    let near = report("near", ReportType::Success, Duration::days(1));
    let out = nearest_first(aggregate(&[far, near], now()), LatLon::new(40.0, -75.0));
    let ids: Vec<_> = out.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["near", "far"]);
}

#[test]
fn summary_totals_reports_and_pharmacies() {
    let reports = vec![
        report("a", ReportType::Success, Duration::days(1)),
        report("a", ReportType::Denial, Duration::days(1)),
        report("b", ReportType::Success, Duration::days(1)),
    ];
    let summary = summarize(&aggregate(&reports, now()));
    assert_eq!(summary.total_pharmacies, 2);
    assert_eq!(summary.success_reports, 2);
    assert_eq!(summary.denial_reports, 1);
}
