//! Threat Triage - command line driver
//!
//! # Usage
//!
//! ```bash
//! # Replay the reference scenario and print the 10:45:00 report
//! threat-triage demo
//!
//! # Interactive console on the wall clock (background sweeper enabled)
//! threat-triage console
//!
//! # Interactive console on a virtual clock, moved with WAIT <seconds>
//! threat-triage console --simulated --start 10:42:50
//! ```
//!
//! # Environment Variables
//!
//! - `TRIAGE_CONFIG`: Path to a TOML config file (default: ./triage_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use threat_triage::clock::parse_timestamp;
use threat_triage::config::TriageConfig;
use threat_triage::console::{self, ReportFormat, Reply, Session, SessionClock, SharedSession};
use threat_triage::demo;
use threat_triage::registry::TriageRegistry;
use threat_triage::UnknownClassificationPolicy;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "threat-triage")]
#[command(about = "Threat triage registry with TTL-based archival")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides TRIAGE_CONFIG and ./triage_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the policy for unrecognized classifications
    #[arg(long, global = true, value_enum)]
    unknown_policy: Option<UnknownClassificationPolicy>,

    /// Print reports as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<SubCommand>,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Replay the reference scenario and print its report
    Demo {
        /// Date to place the scenario on (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Read ADD / WAIT / REPORT / DEMO / HELP / EXIT commands from stdin
    Console {
        /// Use a virtual clock moved only by WAIT
        #[arg(long)]
        simulated: bool,

        /// Virtual clock start (HH:MM:SS or YYYY-MM-DD HH:MM:SS); implies --simulated
        #[arg(long, value_name = "TIME")]
        start: Option<String>,
    },
}

// ============================================================================
// Task Names for Supervisor Logging
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum TaskName {
    Sweeper,
}

impl std::fmt::Display for TaskName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sweeper => write!(f, "Sweeper"),
        }
    }
}

// ============================================================================
// Setup
// ============================================================================

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    if json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(args: &CliArgs) -> Result<TriageConfig> {
    let mut config =
        TriageConfig::resolve(args.config.as_deref()).context("Failed to load triage config")?;
    if let Some(policy) = args.unknown_policy {
        info!(%policy, "Unknown-classification policy overridden from command line");
        config.intake.unknown_policy = policy;
    }
    Ok(config)
}

fn report_format(json: bool) -> ReportFormat {
    if json {
        ReportFormat::Json
    } else {
        ReportFormat::Text
    }
}

// ============================================================================
// Demo
// ============================================================================

fn run_demo(config: &TriageConfig, date: Option<NaiveDate>, json: bool) -> Result<()> {
    let anchor = date.unwrap_or_else(|| Local::now().date_naive());
    info!(%anchor, "Replaying reference scenario");

    let mut registry = TriageRegistry::with_config(config);
    let report = demo::run_reference_scenario(&mut registry, anchor);
    info!(
        pending = report.pending_count(),
        archived = report.history.len(),
        "Reference scenario replayed"
    );

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        print!("{}", report.render(&config.report.time_format));
    }
    Ok(())
}

// ============================================================================
// Console
// ============================================================================

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Spawn the live sweeper into the JoinSet.
fn spawn_sweeper(
    task_set: &mut JoinSet<Result<TaskName>>,
    session: SharedSession,
    interval_secs: u64,
    cancel_token: CancellationToken,
) {
    task_set.spawn(async move {
        info!("[Sweeper] Task starting (every {}s)", interval_secs);
        let archived = console::run_sweeper(
            session,
            std::time::Duration::from_secs(interval_secs),
            cancel_token,
        )
        .await;
        info!("[Sweeper] Stopped after archiving {} threats", archived);
        Ok(TaskName::Sweeper)
    });
}

async fn run_console(
    config: TriageConfig,
    simulated: bool,
    start: Option<String>,
    json: bool,
) -> Result<()> {
    let today = Local::now().date_naive();
    let clock = match start {
        Some(text) => SessionClock::simulated(
            parse_timestamp(&text, today).context("Invalid --start time")?,
        ),
        None if simulated => SessionClock::simulated(Local::now().naive_local()),
        None => SessionClock::live(),
    };

    let sweep_interval = config.sweeper.interval_secs;
    let live = clock.is_live();
    let session: SharedSession = Arc::new(Mutex::new(
        Session::new(config, clock).with_format(report_format(json)),
    ));

    let cancel_token = CancellationToken::new();
    let mut task_set: JoinSet<Result<TaskName>> = JoinSet::new();
    if live {
        spawn_sweeper(&mut task_set, Arc::clone(&session), sweep_interval, cancel_token.clone());
    }

    let mode = if live { "" } else { " (simulated clock)" };
    println!("Threat triage ready{mode}. Type HELP for commands.");

    let mut lines = console::spawn_line_reader(std::io::BufReader::new(std::io::stdin()));
    loop {
        prompt();
        let line = tokio::select! {
            line = lines.recv() => line.transpose().context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C");
                None
            }
        };
        let Some(line) = line else {
            println!();
            break;
        };

        let reply = session.lock().await.handle_line(&line);
        match reply {
            Ok(None) => {}
            Ok(Some(Reply::Text(text))) => println!("{text}"),
            Ok(Some(Reply::Exit)) => break,
            Err(e) => println!("Error: {e}"),
        }
    }

    cancel_token.cancel();
    while let Some(result) = task_set.join_next().await {
        match result {
            Ok(Ok(name)) => info!("[{}] Task finished", name),
            Ok(Err(e)) => error!("Task failed: {:#}", e),
            Err(e) => warn!("Task panicked or was aborted: {}", e),
        }
    }
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_tracing(args.log_json);

    let config = load_config(&args)?;

    match args.command {
        Some(SubCommand::Demo { date }) => run_demo(&config, date, args.json),
        Some(SubCommand::Console { simulated, start }) => {
            run_console(config, simulated, start, args.json).await
        }
        None => run_console(config, false, None, args.json).await,
    }
}
