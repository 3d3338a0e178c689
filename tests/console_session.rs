//! Console Session Tests
//!
//! Replays the reference scenario through line commands on a simulated
//! clock (ADD at the current virtual time, WAIT to move forward) and checks
//! the console reproduces the same report as the scripted replay.

use chrono::NaiveDate;
use threat_triage::console::{ConsoleError, Reply, Session, SessionClock};
use threat_triage::{TriageConfig, TriageError};

fn session_at(h: u32, m: u32, s: u32) -> Session {
    let start = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap();
    Session::new(TriageConfig::default(), SessionClock::simulated(start))
}

fn run_script(session: &mut Session, script: &str) -> Vec<String> {
    script
        .lines()
        .filter_map(|line| match session.handle_line(line) {
            Ok(Some(Reply::Text(text))) => Some(text),
            Ok(Some(Reply::Exit)) | Ok(None) => None,
            Err(e) => panic!("line '{line}' failed: {e}"),
        })
        .collect()
}

const SCENARIO: &str = "\
ADD M1 High Critical threat in north sector
WAIT 3
ADD M2 FalseAlarm Unfounded report
WAIT 4
ADD M3 High Confirmed suspicious activity
WAIT 14
ADD M4 Low Surveillance required in east zone
WAIT 16
ADD M5 FalseAlarm False alarm triggered
WAIT 34
ADD M6 Low Irregular movement detected
WAIT 36
ADD M7 Low Reconnaissance needed
WAIT 6
ADD M8 High Imminent threat confirmed
WAIT 17
REPORT";

#[test]
fn scripted_console_matches_reference_report() {
    let mut session = session_at(10, 42, 50);
    let output = run_script(&mut session, SCENARIO);
    let report = output.last().unwrap();

    assert!(report.contains("THREAT REPORT - 10:45:00"));
    assert!(report.contains("High-risk threats:\n  M8 (High), 10:44:43\n"));
    assert!(report.contains("  M4 (Low), 10:43:11\n  M6 (Low), 10:44:01\n  M7 (Low), 10:44:37\n"));
    assert!(report.contains(
        "History:\n  M2 (FalseAlarm), 10:42:53\n  M5 (FalseAlarm), 10:43:27\n  M1 (High), 10:43:50\n  M3 (High), 10:43:57\n"
    ));
}

#[test]
fn waits_report_archivals_as_they_happen() {
    let mut session = session_at(10, 42, 50);
    let output = run_script(&mut session, SCENARIO);

    // M1 and M3 expire during the 34 s wait ending at 10:44:01
    assert!(output.contains(&"Clock advanced to 10:44:01 (2 archived: M1, M3)".to_string()));
    assert!(output.contains(&"Clock advanced to 10:45:00".to_string()));
}

#[test]
fn sweep_uses_ttl_boundary_even_after_long_wait() {
    let mut session = session_at(9, 0, 0);
    run_script(&mut session, "ADD L1 Low\nWAIT 3600");
    let history = session.registry().history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].to_string(), "L1 (Low), 09:03:00");
}

#[test]
fn errors_leave_session_usable() {
    let mut session = session_at(9, 0, 0);

    assert_eq!(
        session.handle_line("ADD M1 Critical"),
        Err(ConsoleError::Triage(TriageError::InvalidClassification("Critical".to_string())))
    );
    assert!(matches!(session.handle_line("FLY"), Err(ConsoleError::UnknownCommand(_))));
    assert!(matches!(session.handle_line("WAIT x"), Err(ConsoleError::InvalidNumber(_))));

    let output = run_script(&mut session, "ADD M1 High\nREPORT");
    assert!(output[1].contains("M1 (High), 09:00:00"));
}

#[test]
fn help_lists_every_command() {
    let mut session = session_at(9, 0, 0);
    let output = run_script(&mut session, "HELP");
    for word in ["ADD", "WAIT", "REPORT", "DEMO", "HELP", "EXIT"] {
        assert!(output[0].contains(word), "help text missing {word}");
    }
}
