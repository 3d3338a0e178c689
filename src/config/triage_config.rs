//! Triage Configuration - TTLs, intake policy and reporting as TOML values
//!
//! Each struct implements `Default` with the values in [`super::defaults`],
//! so a missing file or a missing section behaves exactly like the built-in
//! configuration.

use chrono::format::{Item, StrftimeItems};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

use super::defaults;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for a triage deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriageConfig {
    /// Time-to-live per classification
    #[serde(default)]
    pub ttl: TtlConfig,

    /// Label handling at intake
    #[serde(default)]
    pub intake: IntakeConfig,

    /// Background sweeper (live console only)
    #[serde(default)]
    pub sweeper: SweeperConfig,

    /// Report rendering
    #[serde(default)]
    pub report: ReportConfig,
}

impl TriageConfig {
    /// Load configuration using the standard search order:
    /// 1. `$TRIAGE_CONFIG` environment variable
    /// 2. `./triage_config.toml` in the current working directory
    /// 3. Built-in defaults
    ///
    /// Broken files are logged and skipped, never fatal.
    pub fn load() -> Self {
        // 1. Check env var
        if let Ok(path) = std::env::var(defaults::CONFIG_ENV_VAR) {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), "Loaded triage config from {}", defaults::CONFIG_ENV_VAR);
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from {}, falling back", defaults::CONFIG_ENV_VAR);
                    }
                }
            } else {
                warn!(path = %path, "{} points to non-existent file, falling back", defaults::CONFIG_ENV_VAR);
            }
        }

        // 2. Check ./triage_config.toml
        let local = PathBuf::from(defaults::CONFIG_FILE_NAME);
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!("Loaded triage config from ./{}", defaults::CONFIG_FILE_NAME);
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./{}, using defaults", defaults::CONFIG_FILE_NAME);
                }
            }
        }

        // 3. Defaults
        info!("No {} found - using built-in defaults", defaults::CONFIG_FILE_NAME);
        Self::default()
    }

    /// Use `explicit` if given (errors are returned), otherwise the
    /// standard search order.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                let config = Self::load_from_file(path)?;
                info!(path = %path.display(), "Loaded triage config");
                Ok(config)
            }
            None => Ok(Self::load()),
        }
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        Self::from_toml_str(&contents).map_err(|e| match e {
            ConfigError::Parse(_, inner) => ConfigError::Parse(path.to_path_buf(), inner),
            other => other,
        })
    }

    /// Parse and validate a TOML document.
    ///
    /// Unknown keys only produce warnings; parse and range errors fail.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        // Two-pass: check for unknown keys first (warnings only)
        for w in super::validation::validate_unknown_keys(contents) {
            warn!("{}", w);
        }

        let config: Self = toml::from_str(contents)
            .map_err(|e| ConfigError::Parse(PathBuf::from("<inline>"), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the current config to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::Serialize)
    }

    /// Validate all values for internal consistency.
    ///
    /// Rules:
    /// - TTLs must be in `1..=MAX_TTL_SECS`
    /// - Sweeper interval must be > 0
    /// - Time format must be a non-empty, renderable strftime pattern
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        Self::check_ttl(self.ttl.high_secs, "ttl.high_secs", &mut errors);
        Self::check_ttl(self.ttl.low_secs, "ttl.low_secs", &mut errors);

        if self.sweeper.interval_secs == 0 {
            errors.push("sweeper.interval_secs must be > 0".to_string());
        }

        let pattern = &self.report.time_format;
        if pattern.trim().is_empty() {
            errors.push("report.time_format must not be empty".to_string());
        } else if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
            errors.push(format!("report.time_format '{pattern}' is not a valid strftime pattern"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    fn check_ttl(secs: u64, name: &str, errors: &mut Vec<String>) {
        if secs == 0 {
            errors.push(format!("{name} must be > 0"));
        } else if secs > defaults::MAX_TTL_SECS {
            errors.push(format!(
                "{name} ({secs}) exceeds the maximum of {} seconds",
                defaults::MAX_TTL_SECS
            ));
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Pending lifetime per classification.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TtlConfig {
    pub high_secs: u64,
    pub low_secs: u64,
}

impl Default for TtlConfig {
    fn default() -> Self {
        Self {
            high_secs: defaults::HIGH_TTL_SECS,
            low_secs: defaults::LOW_TTL_SECS,
        }
    }
}

impl TtlConfig {
    pub fn high(&self) -> Duration {
        secs(self.high_secs)
    }

    pub fn low(&self) -> Duration {
        secs(self.low_secs)
    }
}

fn secs(value: u64) -> Duration {
    Duration::seconds(i64::try_from(value.min(defaults::MAX_TTL_SECS)).unwrap_or(0))
}

/// What intake does with a label that is not High, Low or FalseAlarm.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum UnknownClassificationPolicy {
    /// Fail the intake with `InvalidClassification`
    #[default]
    Reject,
    /// Discard the report with a warning
    Ignore,
    /// Keep the report in a separate quarantine list
    Quarantine,
}

impl std::fmt::Display for UnknownClassificationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Reject => write!(f, "reject"),
            Self::Ignore => write!(f, "ignore"),
            Self::Quarantine => write!(f, "quarantine"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct IntakeConfig {
    pub unknown_policy: UnknownClassificationPolicy,
    /// Accept case-insensitive labels and "false alarm" spellings
    pub lenient_labels: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SweeperConfig {
    pub interval_secs: u64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::SWEEP_INTERVAL_SECS,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReportConfig {
    pub time_format: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            time_format: defaults::TIME_FORMAT.to_string(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config I/O error ({}): {1}", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Config parse error ({}): {1}", .0.display())]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Config serialization error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
