//! Notification events emitted by the registry

use serde::{Deserialize, Serialize};

use super::{Classification, Timestamp};

/// What happened to a report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Stored in a pending bucket (or straight into history for false alarms)
    Classified,
    /// Moved from a pending bucket into history by a sweep
    Archived,
    /// Unrecognized label kept aside under the quarantine policy
    Quarantined,
    /// Unrecognized label discarded under the ignore policy
    Dropped,
    /// Unrecognized label refused under the reject policy
    Rejected,
    /// A report snapshot was produced
    ReportGenerated,
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Classified => write!(f, "CLASSIFIED"),
            Self::Archived => write!(f, "ARCHIVED"),
            Self::Quarantined => write!(f, "QUARANTINED"),
            Self::Dropped => write!(f, "DROPPED"),
            Self::Rejected => write!(f, "REJECTED"),
            Self::ReportGenerated => write!(f, "REPORT"),
        }
    }
}

/// Structured notification handed to a [`NotificationSink`](crate::notify::NotificationSink).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriageEvent {
    pub kind: EventKind,
    /// Absent for report events
    pub mission_id: Option<String>,
    pub classification: Option<Classification>,
    /// Original label text when it could not be classified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_label: Option<String>,
    /// Receipt time for intake events, archival time for archive events,
    /// snapshot time for reports
    pub at: Timestamp,
}

impl TriageEvent {
    pub fn classified(mission_id: &str, classification: Classification, at: Timestamp) -> Self {
        Self {
            kind: EventKind::Classified,
            mission_id: Some(mission_id.to_string()),
            classification: Some(classification),
            raw_label: None,
            at,
        }
    }

    pub fn archived(mission_id: &str, classification: Classification, at: Timestamp) -> Self {
        Self {
            kind: EventKind::Archived,
            mission_id: Some(mission_id.to_string()),
            classification: Some(classification),
            raw_label: None,
            at,
        }
    }

    /// Event for a label that failed classification (`Quarantined`, `Dropped` or `Rejected`).
    pub fn unclassified(kind: EventKind, mission_id: &str, raw_label: &str, at: Timestamp) -> Self {
        Self {
            kind,
            mission_id: Some(mission_id.to_string()),
            classification: None,
            raw_label: Some(raw_label.to_string()),
            at,
        }
    }

    pub const fn report(at: Timestamp) -> Self {
        Self {
            kind: EventKind::ReportGenerated,
            mission_id: None,
            classification: None,
            raw_label: None,
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn kind_display_and_wire_names() {
        assert_eq!(EventKind::Classified.to_string(), "CLASSIFIED");
        assert_eq!(EventKind::ReportGenerated.to_string(), "REPORT");
        assert_eq!(
            serde_json::to_string(&EventKind::ReportGenerated).unwrap(),
            "\"report_generated\""
        );
    }

    #[test]
    fn unclassified_event_keeps_raw_label() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let event = TriageEvent::unclassified(EventKind::Quarantined, "X1", "Medium", at);
        assert_eq!(event.raw_label.as_deref(), Some("Medium"));
        assert_eq!(event.classification, None);
        assert_eq!(event.kind.to_string(), "QUARANTINED");
    }
}
