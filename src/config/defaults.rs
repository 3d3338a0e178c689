//! System-wide default constants.
//!
//! Grouped by subsystem for easy discovery. Every value here can be
//! overridden from `triage_config.toml` unless noted otherwise.

// ============================================================================
// Expiry
// ============================================================================

/// Time a high-risk threat stays pending before archival (seconds).
pub const HIGH_TTL_SECS: u64 = 60;

/// Time a low-risk threat stays pending before archival (seconds).
pub const LOW_TTL_SECS: u64 = 180;

/// Upper bound accepted for any TTL (seconds). 604 800 = 7 days.
pub const MAX_TTL_SECS: u64 = 604_800;

// ============================================================================
// Live Sweeper
// ============================================================================

/// Interval between background sweeps in live console mode (seconds).
pub const SWEEP_INTERVAL_SECS: u64 = 1;

// ============================================================================
// Reporting
// ============================================================================

/// strftime pattern for times in records and reports.
pub const TIME_FORMAT: &str = "%H:%M:%S";

// ============================================================================
// Config Discovery (not overridable)
// ============================================================================

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "TRIAGE_CONFIG";

/// Config file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "triage_config.toml";
