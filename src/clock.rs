//! Time sources and timestamp parsing
//!
//! The registry never reads the clock itself: every time-sensitive call
//! takes an explicit [`Timestamp`]. Drivers pick a [`Clock`] to supply it,
//! either the local wall clock or a [`SimulatedClock`] that only moves
//! when told to.

use chrono::{Duration, Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::TimestampFormatError;
use crate::types::Timestamp;

/// Supplies "now" to drivers.
pub trait Clock {
    fn now(&self) -> Timestamp;
}

/// Local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Local::now().naive_local()
    }
}

/// Virtual clock for replays and tests. Only moves via [`advance`](Self::advance)
/// or [`set`](Self::set).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedClock {
    now: Timestamp,
}

impl SimulatedClock {
    pub const fn starting_at(start: Timestamp) -> Self {
        Self { now: start }
    }

    /// Move forward by `by`. Negative durations are ignored.
    pub fn advance(&mut self, by: Duration) -> Timestamp {
        if by > Duration::zero() {
            self.now += by;
        }
        self.now
    }

    pub fn set(&mut self, to: Timestamp) {
        self.now = to;
    }
}

impl Clock for SimulatedClock {
    fn now(&self) -> Timestamp {
        self.now
    }
}

const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse operator-entered time text.
///
/// Accepts `HH:MM:SS` (placed on `anchor`), `YYYY-MM-DD HH:MM:SS` and
/// `YYYY-MM-DDTHH:MM:SS`.
pub fn parse_timestamp(text: &str, anchor: NaiveDate) -> Result<Timestamp, TimestampFormatError> {
    let trimmed = text.trim();

    if let Ok(time) = NaiveTime::parse_from_str(trimmed, "%H:%M:%S") {
        return Ok(anchor.and_time(time));
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| TimestampFormatError::new(text))
}
