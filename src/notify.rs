//! Notification sinks
//!
//! The registry reports every classification, archival and report as a
//! [`TriageEvent`]. How those events are surfaced is up to the sink.

use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

use crate::types::{Classification, EventKind, TriageEvent};

/// Receives structured triage events.
pub trait NotificationSink: Send {
    fn notify(&self, event: &TriageEvent);
}

/// Default sink: structured `tracing` events with operator-facing messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn notify(&self, event: &TriageEvent) {
        let mission_id = event.mission_id.as_deref().unwrap_or("-");
        match (event.kind, event.classification) {
            (EventKind::Classified, Some(Classification::High)) => info!(
                mission_id,
                classification = "High",
                "Threat {} classified as HIGH - assigned to elite squads",
                mission_id
            ),
            (EventKind::Classified, Some(Classification::Low)) => info!(
                mission_id,
                classification = "Low",
                "Threat {} classified as LOW - assigned for reconnaissance",
                mission_id
            ),
            (EventKind::Classified, Some(Classification::FalseAlarm)) => info!(
                mission_id,
                classification = "FalseAlarm",
                "Threat {} archived as FALSE ALARM",
                mission_id
            ),
            (EventKind::Archived, classification) => info!(
                mission_id,
                classification = classification.map_or("-", Classification::label),
                archived_at = %event.at,
                "Threat {} expired and moved to history",
                mission_id
            ),
            (EventKind::Quarantined | EventKind::Dropped | EventKind::Rejected, _) => warn!(
                mission_id,
                raw_label = event.raw_label.as_deref().unwrap_or(""),
                kind = %event.kind,
                "Unrecognized classification for threat {}",
                mission_id
            ),
            (EventKind::ReportGenerated, _) => debug!(at = %event.at, "Report generated"),
            (EventKind::Classified, None) => {}
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _event: &TriageEvent) {}
}

/// In-memory sink. Clones share the same event log, so a caller can keep
/// one handle and give the other to the registry.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<TriageEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far, in emission order.
    pub fn events(&self) -> Vec<TriageEvent> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }

    /// Recorded events of one kind.
    pub fn of_kind(&self, kind: EventKind) -> Vec<TriageEvent> {
        self.events().into_iter().filter(|e| e.kind == kind).collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clear();
    }
}

impl NotificationSink for RecordingSink {
    fn notify(&self, event: &TriageEvent) {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(event.clone());
    }
}
