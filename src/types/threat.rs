//! Threat record and classification types

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::str::FromStr;

use crate::config::{defaults, TtlConfig};
use crate::error::TriageError;

/// Wall-clock instant used for receipt and archival times.
///
/// Naive local time: operators read these as `HH:MM:SS` on the console.
pub type Timestamp = NaiveDateTime;

/// Format a timestamp with a strftime pattern, falling back to `HH:MM:SS`
/// if the pattern cannot be rendered.
pub fn format_time(ts: &Timestamp, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", ts.format(pattern)).is_err() {
        out.clear();
        let _ = write!(out, "{}", ts.format(defaults::TIME_FORMAT));
    }
    out
}

// ============================================================================
// Classification
// ============================================================================

/// Risk classification assigned to a threat at intake.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Classification {
    High,
    Low,
    FalseAlarm,
}

impl Classification {
    pub const ALL: [Self; 3] = [Self::High, Self::Low, Self::FalseAlarm];

    /// Canonical label, as accepted by the strict parser.
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Low => "Low",
            Self::FalseAlarm => "FalseAlarm",
        }
    }

    /// Time a record of this class stays pending. `None` for false alarms,
    /// which are archived at intake.
    pub fn ttl(self, ttl: &TtlConfig) -> Option<Duration> {
        match self {
            Self::High => Some(ttl.high()),
            Self::Low => Some(ttl.low()),
            Self::FalseAlarm => None,
        }
    }

    /// Case-insensitive parse that also accepts common spellings of
    /// "false alarm" (`false alarm`, `false-alarm`, `false_alarm`, `false`).
    pub fn parse_lenient(raw: &str) -> Result<Self, TriageError> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match normalized.as_str() {
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "falsealarm" | "false" => Ok(Self::FalseAlarm),
            _ => Err(TriageError::InvalidClassification(raw.to_string())),
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Strict, case-sensitive parse of the canonical labels.
impl FromStr for Classification {
    type Err = TriageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| TriageError::InvalidClassification(s.to_string()))
    }
}

// ============================================================================
// Threat Record
// ============================================================================

/// A reported threat.
///
/// Identity, description, classification and receipt time are fixed at
/// creation. `archived_at` is set exactly once, by the registry, when the
/// record moves into history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreatRecord {
    mission_id: String,
    description: String,
    classification: Classification,
    received_at: Timestamp,
    archived_at: Option<Timestamp>,
}

impl ThreatRecord {
    pub fn new(
        mission_id: impl Into<String>,
        description: impl Into<String>,
        classification: Classification,
        received_at: Timestamp,
    ) -> Self {
        Self {
            mission_id: mission_id.into(),
            description: description.into(),
            classification,
            received_at,
            archived_at: None,
        }
    }

    pub fn mission_id(&self) -> &str {
        &self.mission_id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub const fn classification(&self) -> Classification {
        self.classification
    }

    pub const fn received_at(&self) -> Timestamp {
        self.received_at
    }

    pub const fn archived_at(&self) -> Option<Timestamp> {
        self.archived_at
    }

    pub const fn is_archived(&self) -> bool {
        self.archived_at.is_some()
    }

    /// TTL boundary for a pending record; `None` for false alarms.
    pub fn expires_at(&self, ttl: &TtlConfig) -> Option<Timestamp> {
        self.classification
            .ttl(ttl)
            .map(|d| self.received_at + d)
    }

    /// Whether `now - received_at >= TTL`. False alarms count as expired
    /// from the moment they are received.
    pub fn is_expired(&self, now: Timestamp, ttl: &TtlConfig) -> bool {
        match self.classification.ttl(ttl) {
            Some(d) => now - self.received_at >= d,
            None => true,
        }
    }

    /// Receipt time while pending, archival time once archived.
    pub fn display_time(&self) -> Timestamp {
        self.archived_at.unwrap_or(self.received_at)
    }

    /// `"<id> (<classification>), <time>"` rendered with `pattern`.
    pub fn render(&self, pattern: &str) -> String {
        format!(
            "{} ({}), {}",
            self.mission_id,
            self.classification,
            format_time(&self.display_time(), pattern)
        )
    }

    /// Stamp the archival time. Returns `false` and leaves the record
    /// untouched if it was already archived.
    pub(crate) fn archive(&mut self, at: Timestamp) -> bool {
        if self.archived_at.is_some() {
            return false;
        }
        self.archived_at = Some(at);
        true
    }
}

impl std::fmt::Display for ThreatRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render(defaults::TIME_FORMAT))
    }
}
