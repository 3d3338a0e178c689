//! Reference Scenario Regression Tests
//!
//! Replays the eight-report dataset (M1..M8, 10:42:50 to 10:44:43) and checks
//! the 10:45:00 report: which threats are still pending, which were archived,
//! at what time, and in what order.

use chrono::NaiveDate;
use threat_triage::demo::{on_anchor, run_reference_scenario, REFERENCE_CASES};
use threat_triage::notify::RecordingSink;
use threat_triage::types::{Classification, EventKind, TriageReport};
use threat_triage::TriageRegistry;

fn anchor() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn run() -> (TriageRegistry, TriageReport) {
    let mut registry = TriageRegistry::new();
    let report = run_reference_scenario(&mut registry, anchor());
    (registry, report)
}

#[test]
fn only_m8_remains_high_pending() {
    let (_, report) = run();
    assert_eq!(TriageReport::ids(&report.pending_high), vec!["M8"]);
    assert_eq!(report.pending_high[0].archived_at, None);
}

#[test]
fn all_low_threats_remain_pending() {
    let (_, report) = run();
    assert_eq!(TriageReport::ids(&report.pending_low), vec!["M4", "M6", "M7"]);
}

#[test]
fn history_holds_false_alarms_then_expired_highs() {
    let (_, report) = run();
    assert_eq!(TriageReport::ids(&report.history), vec!["M2", "M5", "M1", "M3"]);

    let archived: Vec<_> = report
        .history
        .iter()
        .map(|e| e.archived_at.unwrap())
        .collect();
    assert_eq!(
        archived,
        vec![
            on_anchor(anchor(), (10, 42, 53)),
            on_anchor(anchor(), (10, 43, 27)),
            on_anchor(anchor(), (10, 43, 50)),
            on_anchor(anchor(), (10, 43, 57)),
        ]
    );
}

#[test]
fn rendered_report_matches_expected_lines() {
    let (_, report) = run();
    let text = report.to_string();

    let expected = [
        "THREAT REPORT - 10:45:00",
        "High-risk threats:\n  M8 (High), 10:44:43\n",
        "Low-risk threats:\n  M4 (Low), 10:43:11\n  M6 (Low), 10:44:01\n  M7 (Low), 10:44:37\n",
        "History:\n  M2 (FalseAlarm), 10:42:53\n  M5 (FalseAlarm), 10:43:27\n  M1 (High), 10:43:50\n  M3 (High), 10:43:57\n",
    ];
    for fragment in expected {
        assert!(text.contains(fragment), "missing fragment:\n{fragment}\nin:\n{text}");
    }
}

#[test]
fn every_case_is_accounted_for_exactly_once() {
    let (registry, report) = run();
    assert_eq!(registry.len(), REFERENCE_CASES.len());

    for case in REFERENCE_CASES {
        let appearances = [&report.pending_high, &report.pending_low, &report.history]
            .iter()
            .flat_map(|entries| entries.iter())
            .filter(|e| e.mission_id == case.mission_id)
            .count();
        assert_eq!(appearances, 1, "{} appears {} times", case.mission_id, appearances);
    }
}

#[test]
fn notifications_follow_the_scenario() {
    let sink = RecordingSink::new();
    let mut registry = TriageRegistry::new().with_sink(sink.clone());
    run_reference_scenario(&mut registry, anchor());

    let classified = sink.of_kind(EventKind::Classified);
    assert_eq!(classified.len(), 8);
    assert_eq!(classified[1].classification, Some(Classification::FalseAlarm));

    let archived: Vec<_> = sink
        .of_kind(EventKind::Archived)
        .into_iter()
        .filter_map(|e| e.mission_id)
        .collect();
    assert_eq!(archived, vec!["M1", "M3"]);

    assert_eq!(sink.of_kind(EventKind::ReportGenerated).len(), 1);
}

#[test]
fn later_report_drains_everything() {
    let (mut registry, _) = run();
    // M7 is the last to expire, at 10:47:37
    let report = registry.generate_report(on_anchor(anchor(), (10, 47, 37)));
    assert!(report.pending_high.is_empty());
    assert!(report.pending_low.is_empty());
    assert_eq!(
        TriageReport::ids(&report.history),
        vec!["M2", "M5", "M1", "M3", "M8", "M4", "M6", "M7"]
    );
}
