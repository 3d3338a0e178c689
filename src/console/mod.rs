//! Console Session
//!
//! Drives a [`TriageRegistry`] from line commands. The session owns the
//! registry and its clock; every command reads "now" from that clock and
//! passes it explicitly into the registry.
//!
//! Two clock modes:
//! - **Live**: local wall clock; a background sweeper keeps buckets current
//! - **Simulated**: virtual clock moved only by `WAIT`, for replaying scenarios
//!   without waiting in real time

mod command;
mod input;
mod sweeper;

pub use command::{Command, HELP_TEXT};
pub use input::spawn_line_reader;
pub use sweeper::{run_sweeper, SharedSession};

use chrono::Duration;
use std::fmt::Write as _;
use thiserror::Error;
use tracing::{debug, info};

use crate::clock::{Clock, SimulatedClock, SystemClock};
use crate::config::TriageConfig;
use crate::demo;
use crate::error::TriageError;
use crate::notify::NullSink;
use crate::registry::{Bucket, IntakeOutcome, SweepSummary, TriageRegistry};
use crate::types::{format_time, Classification, Timestamp, TriageReport};

/// Errors reported back to the console user. None of them end the session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConsoleError {
    #[error("Empty command")]
    EmptyLine,

    #[error("Unknown command '{0}' (type HELP for a list)")]
    UnknownCommand(String),

    #[error("{command} is missing its <{argument}> argument")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error("'{0}' is not a valid number of seconds")]
    InvalidNumber(String),

    #[error("WAIT is only available with the simulated clock")]
    WaitRequiresSimulatedClock,

    #[error("Failed to render report: {0}")]
    Render(String),

    #[error(transparent)]
    Triage(#[from] TriageError),
}

/// Where a session gets "now" from.
#[derive(Debug, Clone, Copy)]
pub enum SessionClock {
    Live(SystemClock),
    Simulated(SimulatedClock),
}

impl SessionClock {
    pub const fn live() -> Self {
        Self::Live(SystemClock)
    }

    pub const fn simulated(start: Timestamp) -> Self {
        Self::Simulated(SimulatedClock::starting_at(start))
    }

    pub const fn is_live(&self) -> bool {
        matches!(self, Self::Live(_))
    }
}

impl Clock for SessionClock {
    fn now(&self) -> Timestamp {
        match self {
            Self::Live(c) => c.now(),
            Self::Simulated(c) => c.now(),
        }
    }
}

/// Output of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Text(String),
    Exit,
}

/// How reports are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug)]
pub struct Session {
    registry: TriageRegistry,
    clock: SessionClock,
    config: TriageConfig,
    format: ReportFormat,
}

impl Session {
    pub fn new(config: TriageConfig, clock: SessionClock) -> Self {
        Self {
            registry: TriageRegistry::with_config(&config),
            clock,
            config,
            format: ReportFormat::Text,
        }
    }

    /// Use a pre-built registry (custom sink or policy).
    #[must_use]
    pub fn with_registry(mut self, registry: TriageRegistry) -> Self {
        self.registry = registry;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    pub const fn registry(&self) -> &TriageRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut TriageRegistry {
        &mut self.registry
    }

    pub const fn clock(&self) -> &SessionClock {
        &self.clock
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Sweep at the session clock's current time.
    pub fn sweep(&mut self) -> SweepSummary {
        let now = self.clock.now();
        self.registry.sweep_expired(now)
    }

    /// Parse and execute one input line. Blank lines yield `Ok(None)`.
    pub fn handle_line(&mut self, line: &str) -> Result<Option<Reply>, ConsoleError> {
        match line.parse::<Command>() {
            Ok(cmd) => self.execute(cmd).map(Some),
            Err(ConsoleError::EmptyLine) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn execute(&mut self, command: Command) -> Result<Reply, ConsoleError> {
        debug!(?command, "Executing console command");
        match command {
            Command::Add {
                mission_id,
                classification,
                description,
            } => self.add(&mission_id, &classification, &description),
            Command::Wait { seconds } => self.wait(seconds),
            Command::Report => {
                let now = self.clock.now();
                let report = self.registry.generate_report(now);
                self.render(&report).map(Reply::Text)
            }
            Command::Demo => self.demo(),
            Command::Help => Ok(Reply::Text(HELP_TEXT.to_string())),
            Command::Exit => {
                info!("Console session closed");
                Ok(Reply::Exit)
            }
        }
    }

    fn add(
        &mut self,
        mission_id: &str,
        label: &str,
        description: &str,
    ) -> Result<Reply, ConsoleError> {
        let now = self.clock.now();
        let (label, description) = self.split_label(label, description);
        let outcome = self
            .registry
            .intake_label(mission_id, description, &label, now)?;
        let time = self.fmt_time(&now);

        let text = match outcome {
            IntakeOutcome::Stored(Bucket::PendingHigh) => {
                format!("Threat {mission_id} received at {time}: HIGH risk, pending")
            }
            IntakeOutcome::Stored(Bucket::PendingLow) => {
                format!("Threat {mission_id} received at {time}: LOW risk, pending")
            }
            IntakeOutcome::Stored(Bucket::History) => {
                format!("Threat {mission_id} received at {time}: FALSE ALARM, archived")
            }
            IntakeOutcome::Quarantined => {
                format!("Threat {mission_id} quarantined: unrecognized classification '{label}'")
            }
            IntakeOutcome::Dropped => {
                format!("Threat {mission_id} dropped: unrecognized classification '{label}'")
            }
        };
        Ok(Reply::Text(text))
    }

    /// With lenient labels on, a label may span two words ("false alarm").
    /// The pair wins over the single word when it parses; the second word
    /// is then taken off the description.
    fn split_label<'a>(&self, label: &str, description: &'a str) -> (String, &'a str) {
        if self.registry.lenient_labels() {
            let mut words = description.splitn(2, char::is_whitespace);
            if let Some(next) = words.next().filter(|w| !w.is_empty()) {
                let pair = format!("{label} {next}");
                if Classification::parse_lenient(&pair).is_ok() {
                    return (pair, words.next().unwrap_or("").trim_start());
                }
            }
        }
        (label.to_string(), description)
    }

    fn wait(&mut self, seconds: u32) -> Result<Reply, ConsoleError> {
        let SessionClock::Simulated(ref mut clock) = self.clock else {
            return Err(ConsoleError::WaitRequiresSimulatedClock);
        };
        let now = clock.advance(Duration::seconds(i64::from(seconds)));
        let summary = self.registry.sweep_expired(now);

        let mut text = format!("Clock advanced to {}", self.fmt_time(&now));
        if !summary.is_empty() {
            let _ = write!(
                text,
                " ({} archived: {})",
                summary.total(),
                summary.archived.join(", ")
            );
        }
        Ok(Reply::Text(text))
    }

    /// Replay the reference scenario in a throwaway registry on today's date.
    fn demo(&self) -> Result<Reply, ConsoleError> {
        let mut scratch = TriageRegistry::with_config(&self.config).with_sink(NullSink);
        let report = demo::run_reference_scenario(&mut scratch, self.clock.now().date());
        self.render(&report).map(Reply::Text)
    }

    fn render(&self, report: &TriageReport) -> Result<String, ConsoleError> {
        match self.format {
            ReportFormat::Text => Ok(report.render(&self.config.report.time_format)),
            ReportFormat::Json => serde_json::to_string_pretty(report)
                .map_err(|e| ConsoleError::Render(e.to_string())),
        }
    }

    fn fmt_time(&self, ts: &Timestamp) -> String {
        format_time(ts, &self.config.report.time_format)
    }
}
