//! Triage Configuration Module
//!
//! Provides operator-tunable settings loaded from TOML files: TTLs per
//! classification, the policy for unrecognized labels, the live sweeper
//! interval and the report time format.
//!
//! ## Loading Order
//!
//! 1. `TRIAGE_CONFIG` environment variable (path to TOML file)
//! 2. `triage_config.toml` in the current working directory
//! 3. Built-in defaults (see [`defaults`])
//!
//! ## Usage
//!
//! ```ignore
//! let config = TriageConfig::load();
//! let registry = TriageRegistry::with_config(&config);
//! ```

mod triage_config;
pub mod defaults;
pub mod validation;

pub use triage_config::*;
