//! Report snapshot types

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

use super::{format_time, Classification, ThreatRecord, Timestamp};
use crate::config::defaults;

const RULE_WIDTH: usize = 50;

/// One line of a report, copied out of a [`ThreatRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportEntry {
    pub mission_id: String,
    pub description: String,
    pub classification: Classification,
    pub received_at: Timestamp,
    #[serde(default)]
    pub archived_at: Option<Timestamp>,
}

impl ReportEntry {
    /// Receipt time while pending, archival time once archived.
    pub fn display_time(&self) -> Timestamp {
        self.archived_at.unwrap_or(self.received_at)
    }

    pub fn render(&self, pattern: &str) -> String {
        format!(
            "{} ({}), {}",
            self.mission_id,
            self.classification,
            format_time(&self.display_time(), pattern)
        )
    }
}

impl From<&ThreatRecord> for ReportEntry {
    fn from(record: &ThreatRecord) -> Self {
        Self {
            mission_id: record.mission_id().to_string(),
            description: record.description().to_string(),
            classification: record.classification(),
            received_at: record.received_at(),
            archived_at: record.archived_at(),
        }
    }
}

/// A report whose label matched no classification, held under the
/// quarantine policy. Never swept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuarantineEntry {
    pub mission_id: String,
    pub description: String,
    pub raw_label: String,
    pub received_at: Timestamp,
}

impl QuarantineEntry {
    pub fn render(&self, pattern: &str) -> String {
        format!(
            "{} [{}], {}",
            self.mission_id,
            self.raw_label,
            format_time(&self.received_at, pattern)
        )
    }
}

/// Post-sweep snapshot of the registry.
///
/// Every listing is in insertion order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriageReport {
    pub generated_at: Timestamp,
    pub pending_high: Vec<ReportEntry>,
    pub pending_low: Vec<ReportEntry>,
    pub history: Vec<ReportEntry>,
    #[serde(default)]
    pub quarantine: Vec<QuarantineEntry>,
}

impl TriageReport {
    pub fn pending_count(&self) -> usize {
        self.pending_high.len() + self.pending_low.len()
    }

    /// Mission ids of one listing, in order. Handy for assertions and summaries.
    pub fn ids(entries: &[ReportEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.mission_id.as_str()).collect()
    }

    /// Render the console form of the report using `pattern` for times.
    pub fn render(&self, pattern: &str) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        let mut out = String::new();

        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "THREAT REPORT - {}",
            format_time(&self.generated_at, pattern)
        );
        let _ = writeln!(out, "{rule}");

        Self::render_section(
            &mut out,
            "High-risk threats:",
            &self.pending_high,
            "No high-risk threats pending",
            pattern,
        );
        Self::render_section(
            &mut out,
            "Low-risk threats:",
            &self.pending_low,
            "No low-risk threats pending",
            pattern,
        );
        Self::render_section(
            &mut out,
            "History:",
            &self.history,
            "No threats in history",
            pattern,
        );

        if !self.quarantine.is_empty() {
            let _ = writeln!(out, "\nQuarantine:");
            for entry in &self.quarantine {
                let _ = writeln!(out, "  {}", entry.render(pattern));
            }
        }

        let _ = writeln!(out, "{rule}");
        out
    }

    fn render_section(
        out: &mut String,
        title: &str,
        entries: &[ReportEntry],
        empty: &str,
        pattern: &str,
    ) {
        let _ = writeln!(out, "\n{title}");
        if entries.is_empty() {
            let _ = writeln!(out, "  {empty}");
        }
        for entry in entries {
            let _ = writeln!(out, "  {}", entry.render(pattern));
        }
    }
}

impl std::fmt::Display for TriageReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(defaults::TIME_FORMAT))
    }
}
