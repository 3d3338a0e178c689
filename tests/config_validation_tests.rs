//! Config Validation Tests
//!
//! Exercises typo detection, range validation and file loading for
//! `TriageConfig` independently from the registry.

use std::io::Write;

use threat_triage::config::validation::{
    known_config_keys, suggest_correction, validate_unknown_keys,
};
use threat_triage::config::{ConfigError, TriageConfig, UnknownClassificationPolicy};
use threat_triage::{Classification, TriageRegistry};

// ============================================================================
// Typo Detection
// ============================================================================

#[test]
fn typo_in_ttl_key_warns_with_suggestion() {
    let toml_str = r#"
[ttl]
hihg_secs = 45
"#;
    let warnings = validate_unknown_keys(toml_str);
    assert_eq!(warnings.len(), 1, "Expected exactly 1 warning");
    assert_eq!(warnings[0].field, "ttl.hihg_secs");
    assert_eq!(warnings[0].suggestion.as_deref(), Some("ttl.high_secs"));
    assert!(warnings[0].to_string().contains("did you mean 'ttl.high_secs'"));
}

#[test]
fn typo_in_section_name_warns() {
    let toml_str = r#"
[intak]
lenient_labels = true
"#;
    let warnings = validate_unknown_keys(toml_str);
    // Both the section and its key are unknown
    assert_eq!(warnings.len(), 2);
    assert_eq!(warnings[0].field, "intak");
    assert_eq!(warnings[0].suggestion.as_deref(), Some("intake"));
}

#[test]
fn valid_config_produces_zero_warnings() {
    let toml_str = r#"
[ttl]
high_secs = 60
low_secs = 180

[intake]
unknown_policy = "quarantine"
lenient_labels = true

[sweeper]
interval_secs = 2

[report]
time_format = "%H:%M:%S"
"#;
    assert!(validate_unknown_keys(toml_str).is_empty());
    assert!(TriageConfig::from_toml_str(toml_str).is_ok());
}

#[test]
fn far_off_key_gets_no_suggestion() {
    let known = known_config_keys();
    assert_eq!(suggest_correction("completely_unrelated", &known), None);
}

#[test]
fn unknown_keys_do_not_fail_loading() {
    let config = TriageConfig::from_toml_str("[ttl]\nhigh_secs = 90\nmystery = 1\n").unwrap();
    assert_eq!(config.ttl.high_secs, 90);
}

// ============================================================================
// Range Validation
// ============================================================================

#[test]
fn excessive_ttl_is_rejected() {
    let err = TriageConfig::from_toml_str("[ttl]\nhigh_secs = 10000000\n").unwrap_err();
    let ConfigError::Validation(errors) = err else {
        panic!("expected validation error");
    };
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("ttl.high_secs"));
}

#[test]
fn zero_sweep_interval_is_rejected() {
    let err = TriageConfig::from_toml_str("[sweeper]\ninterval_secs = 0\n").unwrap_err();
    assert!(err.to_string().contains("sweeper.interval_secs"));
}

#[test]
fn empty_time_format_is_rejected() {
    let err = TriageConfig::from_toml_str("[report]\ntime_format = \"  \"\n").unwrap_err();
    assert!(err.to_string().contains("report.time_format"));
}

// ============================================================================
// File Loading
// ============================================================================

#[test]
fn load_from_file_applies_values_to_registry() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ttl]\nhigh_secs = 5\n\n[intake]\nunknown_policy = \"ignore\"").unwrap();

    let config = TriageConfig::resolve(Some(file.path())).unwrap();
    assert_eq!(config.intake.unknown_policy, UnknownClassificationPolicy::Ignore);

    let mut registry = TriageRegistry::with_config(&config);
    let t0 = chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    registry.intake("H1", "", Classification::High, t0);
    registry.sweep_expired(t0 + chrono::Duration::seconds(5));
    assert_eq!(registry.history().len(), 1);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = TriageConfig::load_from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Io(ref p, _) if p == &path));
}

#[test]
fn malformed_file_reports_its_path() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[ttl\nhigh_secs = ").unwrap();

    let err = TriageConfig::load_from_file(file.path()).unwrap_err();
    match err {
        ConfigError::Parse(path, _) => assert_eq!(path, file.path()),
        other => panic!("expected parse error, got {other}"),
    }
}
