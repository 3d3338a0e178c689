//! Error types shared across the triage library.

use thiserror::Error;

/// Errors raised by registry intake and label parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TriageError {
    #[error("Invalid classification '{0}' (expected High, Low or FalseAlarm)")]
    InvalidClassification(String),

    #[error(transparent)]
    Timestamp(#[from] TimestampFormatError),
}

/// A timestamp string that matched none of the accepted layouts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid timestamp '{input}': expected HH:MM:SS or YYYY-MM-DD HH:MM:SS")]
pub struct TimestampFormatError {
    pub input: String,
}

impl TimestampFormatError {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}
