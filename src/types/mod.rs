//! Shared data structures for the triage pipeline
//!
//! - `ThreatRecord` / `Classification`: the reported threat and its risk class
//! - `TriageEvent`: structured notifications emitted on intake, archival and reporting
//! - `TriageReport`: post-sweep snapshot of all buckets

mod event;
mod report;
mod threat;

pub use event::*;
pub use report::*;
pub use threat::*;
