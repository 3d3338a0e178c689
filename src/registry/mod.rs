//! Triage Registry - bucket placement, TTL expiry sweep and reporting
//!
//! The registry owns every record it has accepted and keeps each one in
//! exactly one of three ordered sequences:
//!
//! - **pending high**: awaiting expiry after the high-risk TTL (60 s default)
//! - **pending low**: awaiting expiry after the low-risk TTL (180 s default)
//! - **history**: terminal; archived records, in the order they were archived
//!
//! Records move one way only, pending → history. False alarms skip the
//! pending stage and are archived at their receipt time.
//!
//! ## Usage
//!
//! ```ignore
//! let mut registry = TriageRegistry::new();
//! registry.intake("M1", "perimeter breach", Classification::High, received_at);
//!
//! // Later, with a caller-supplied "now":
//! let report = registry.generate_report(now);
//! ```

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::{TriageConfig, TtlConfig, UnknownClassificationPolicy};
use crate::error::TriageError;
use crate::notify::{NotificationSink, TracingSink};
use crate::types::{
    Classification, EventKind, QuarantineEntry, ReportEntry, ThreatRecord, Timestamp, TriageEvent,
    TriageReport,
};

/// Which sequence a record landed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Bucket {
    PendingHigh,
    PendingLow,
    History,
}

impl Bucket {
    pub const fn for_classification(classification: Classification) -> Self {
        match classification {
            Classification::High => Self::PendingHigh,
            Classification::Low => Self::PendingLow,
            Classification::FalseAlarm => Self::History,
        }
    }
}

/// Result of a label-based intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Classified and stored
    Stored(Bucket),
    /// Unrecognized label, kept in quarantine
    Quarantined,
    /// Unrecognized label, discarded
    Dropped,
}

/// What one sweep moved into history.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    pub high_archived: usize,
    pub low_archived: usize,
    /// Mission ids in the order they were appended to history
    pub archived: Vec<String>,
}

impl SweepSummary {
    pub fn total(&self) -> usize {
        self.high_archived + self.low_archived
    }

    pub fn is_empty(&self) -> bool {
        self.archived.is_empty()
    }
}

/// Record counts per sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketCounts {
    pub pending_high: usize,
    pub pending_low: usize,
    pub history: usize,
    pub quarantine: usize,
}

/// In-memory triage state.
pub struct TriageRegistry {
    pending_high: Vec<ThreatRecord>,
    pending_low: Vec<ThreatRecord>,
    history: Vec<ThreatRecord>,
    quarantine: Vec<QuarantineEntry>,
    ttl: TtlConfig,
    unknown_policy: UnknownClassificationPolicy,
    lenient_labels: bool,
    sink: Box<dyn NotificationSink>,
}

impl Default for TriageRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TriageRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriageRegistry")
            .field("pending_high", &self.pending_high)
            .field("pending_low", &self.pending_low)
            .field("history", &self.history)
            .field("quarantine", &self.quarantine)
            .field("ttl", &self.ttl)
            .field("unknown_policy", &self.unknown_policy)
            .field("lenient_labels", &self.lenient_labels)
            .finish_non_exhaustive()
    }
}

impl TriageRegistry {
    /// Empty registry with built-in TTLs, the reject policy and a tracing sink.
    pub fn new() -> Self {
        Self::with_config(&TriageConfig::default())
    }

    pub fn with_config(config: &TriageConfig) -> Self {
        Self {
            pending_high: Vec::new(),
            pending_low: Vec::new(),
            history: Vec::new(),
            quarantine: Vec::new(),
            ttl: config.ttl.clone(),
            unknown_policy: config.intake.unknown_policy,
            lenient_labels: config.intake.lenient_labels,
            sink: Box::new(TracingSink),
        }
    }

    /// Replace the notification sink.
    #[must_use]
    pub fn with_sink(mut self, sink: impl NotificationSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Replace the policy for unrecognized labels.
    #[must_use]
    pub fn with_policy(mut self, policy: UnknownClassificationPolicy) -> Self {
        self.unknown_policy = policy;
        self
    }

    /// Whether label intake uses [`Classification::parse_lenient`].
    pub const fn lenient_labels(&self) -> bool {
        self.lenient_labels
    }

    // ========================================================================
    // Intake
    // ========================================================================

    /// Accept a classified report received at `received_at`.
    ///
    /// High and Low go to the back of their pending bucket. FalseAlarm is
    /// archived immediately with `archived_at = received_at`.
    pub fn intake(
        &mut self,
        mission_id: impl Into<String>,
        description: impl Into<String>,
        classification: Classification,
        received_at: Timestamp,
    ) -> &ThreatRecord {
        let mut record = ThreatRecord::new(mission_id, description, classification, received_at);
        self.sink.notify(&TriageEvent::classified(
            record.mission_id(),
            classification,
            received_at,
        ));

        match classification {
            Classification::High => push_last(&mut self.pending_high, record),
            Classification::Low => push_last(&mut self.pending_low, record),
            Classification::FalseAlarm => {
                record.archive(received_at);
                push_last(&mut self.history, record)
            }
        }
    }

    /// Accept a report whose classification is still raw text.
    ///
    /// Labels that do not parse are handled by the configured
    /// [`UnknownClassificationPolicy`].
    pub fn intake_label(
        &mut self,
        mission_id: &str,
        description: &str,
        raw_label: &str,
        received_at: Timestamp,
    ) -> Result<IntakeOutcome, TriageError> {
        let parsed = if self.lenient_labels {
            Classification::parse_lenient(raw_label)
        } else {
            raw_label.parse::<Classification>()
        };

        let err = match parsed {
            Ok(classification) => {
                self.intake(mission_id, description, classification, received_at);
                return Ok(IntakeOutcome::Stored(Bucket::for_classification(classification)));
            }
            Err(e) => e,
        };

        match self.unknown_policy {
            UnknownClassificationPolicy::Reject => {
                self.sink.notify(&TriageEvent::unclassified(
                    EventKind::Rejected,
                    mission_id,
                    raw_label,
                    received_at,
                ));
                Err(err)
            }
            UnknownClassificationPolicy::Ignore => {
                warn!(mission_id, raw_label, "Dropping threat with unrecognized classification");
                self.sink.notify(&TriageEvent::unclassified(
                    EventKind::Dropped,
                    mission_id,
                    raw_label,
                    received_at,
                ));
                Ok(IntakeOutcome::Dropped)
            }
            UnknownClassificationPolicy::Quarantine => {
                self.quarantine.push(QuarantineEntry {
                    mission_id: mission_id.to_string(),
                    description: description.to_string(),
                    raw_label: raw_label.to_string(),
                    received_at,
                });
                self.sink.notify(&TriageEvent::unclassified(
                    EventKind::Quarantined,
                    mission_id,
                    raw_label,
                    received_at,
                ));
                Ok(IntakeOutcome::Quarantined)
            }
        }
    }

    // ========================================================================
    // Expiry
    // ========================================================================

    /// Move every pending record whose TTL has elapsed at `now` into history.
    ///
    /// Each archived record gets `archived_at = received_at + TTL`, not `now`.
    /// Expired high-risk records are appended before expired low-risk ones;
    /// within a bucket, insertion order is kept. Calling again with the same
    /// or a later `now` never touches records already in history.
    pub fn sweep_expired(&mut self, now: Timestamp) -> SweepSummary {
        let mut summary = SweepSummary::default();

        summary.high_archived = sweep_bucket(
            &mut self.pending_high,
            &self.ttl,
            now,
            &mut self.history,
            self.sink.as_ref(),
            &mut summary.archived,
        );
        summary.low_archived = sweep_bucket(
            &mut self.pending_low,
            &self.ttl,
            now,
            &mut self.history,
            self.sink.as_ref(),
            &mut summary.archived,
        );

        if !summary.is_empty() {
            debug!(
                high = summary.high_archived,
                low = summary.low_archived,
                %now,
                "Sweep archived expired threats"
            );
        }
        summary
    }

    /// Earliest TTL boundary among pending records.
    pub fn next_expiry(&self) -> Option<Timestamp> {
        self.pending_high
            .iter()
            .chain(&self.pending_low)
            .filter_map(|r| r.expires_at(&self.ttl))
            .min()
    }

    // ========================================================================
    // Reporting
    // ========================================================================

    /// Sweep at `now`, then snapshot every sequence in insertion order.
    pub fn generate_report(&mut self, now: Timestamp) -> TriageReport {
        self.sweep_expired(now);

        let report = TriageReport {
            generated_at: now,
            pending_high: self.pending_high.iter().map(ReportEntry::from).collect(),
            pending_low: self.pending_low.iter().map(ReportEntry::from).collect(),
            history: self.history.iter().map(ReportEntry::from).collect(),
            quarantine: self.quarantine.clone(),
        };
        self.sink.notify(&TriageEvent::report(now));
        report
    }

    // ========================================================================
    // Read Access
    // ========================================================================

    pub fn pending_high(&self) -> &[ThreatRecord] {
        &self.pending_high
    }

    pub fn pending_low(&self) -> &[ThreatRecord] {
        &self.pending_low
    }

    pub fn history(&self) -> &[ThreatRecord] {
        &self.history
    }

    pub fn quarantine(&self) -> &[QuarantineEntry] {
        &self.quarantine
    }

    pub fn counts(&self) -> BucketCounts {
        BucketCounts {
            pending_high: self.pending_high.len(),
            pending_low: self.pending_low.len(),
            history: self.history.len(),
            quarantine: self.quarantine.len(),
        }
    }

    /// Classified records across all three sequences (quarantine excluded).
    pub fn len(&self) -> usize {
        self.pending_high.len() + self.pending_low.len() + self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.quarantine.is_empty()
    }

    /// Every classified record with this id. Ids are not unique, so this may
    /// yield more than one.
    pub fn find<'a>(&'a self, mission_id: &'a str) -> impl Iterator<Item = &'a ThreatRecord> + 'a {
        self.pending_high
            .iter()
            .chain(&self.pending_low)
            .chain(&self.history)
            .filter(move |r| r.mission_id() == mission_id)
    }
}

fn push_last<T>(items: &mut Vec<T>, item: T) -> &T {
    items.push(item);
    &items[items.len() - 1]
}

/// Partition `bucket` at `now` in a single pass: expired records are stamped
/// and appended to `history`, the rest replace the bucket in their original
/// order. Returns how many were archived.
fn sweep_bucket(
    bucket: &mut Vec<ThreatRecord>,
    ttl: &TtlConfig,
    now: Timestamp,
    history: &mut Vec<ThreatRecord>,
    sink: &dyn NotificationSink,
    archived_ids: &mut Vec<String>,
) -> usize {
    let (expired, retained): (Vec<_>, Vec<_>) = std::mem::take(bucket)
        .into_iter()
        .partition(|r| r.is_expired(now, ttl));
    *bucket = retained;

    let count = expired.len();
    for mut record in expired {
        let archived_at = record.expires_at(ttl).unwrap_or(record.received_at());
        record.archive(archived_at);
        sink.notify(&TriageEvent::archived(
            record.mission_id(),
            record.classification(),
            archived_at,
        ));
        archived_ids.push(record.mission_id().to_string());
        history.push(record);
    }
    count
}
