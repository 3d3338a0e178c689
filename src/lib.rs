//! Threat Triage: risk classification with TTL-based archival
//!
//! Reported threats are classified High, Low or FalseAlarm, held in a
//! pending bucket for a classification-dependent time-to-live, and then
//! retired into history.
//!
//! ## Architecture
//!
//! - **Registry**: owns the pending-high, pending-low and history sequences;
//!   intake, expiry sweep and reporting
//! - **Types**: threat records, classifications, events and report snapshots
//! - **Clock**: wall-clock and simulated time sources, timestamp parsing
//! - **Notify**: sinks for structured triage events
//! - **Console**: line-command driver with a background sweeper for live use

pub mod clock;
pub mod config;
pub mod console;
pub mod demo;
pub mod error;
pub mod notify;
pub mod registry;
pub mod types;

// Re-export configuration
pub use config::{TriageConfig, UnknownClassificationPolicy};

// Re-export commonly used types
pub use types::{
    Classification, EventKind, ReportEntry, ThreatRecord, Timestamp, TriageEvent, TriageReport,
};

// Re-export the registry
pub use registry::{Bucket, IntakeOutcome, SweepSummary, TriageRegistry};

// Re-export errors
pub use error::{TimestampFormatError, TriageError};
