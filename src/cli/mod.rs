// CLI module - User-facing command-line interface

pub mod output;

use crate::config::SupervisorConfig;
use crate::error::{Result, VigilError};
use crate::pm2::Pm2Client;
use crate::scan::{SignalTerminator, SnapshotProvider, SystemScanner};
use crate::supervisor::{run_supervision_cycle, Classifier};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Vigil - a self-healing supervisor for a pm2-managed service
#[derive(Parser)]
#[command(name = "vigil")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to the supervisor configuration file (.toml or .json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a single supervision cycle and print its report
    Run {
        /// Emit the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run supervision cycles on a fixed interval until interrupted
    Watch {
        /// Seconds between cycles (defaults to the configured interval)
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Classify the current process table without taking any action
    Scan,
}

impl Cli {
    /// Parse arguments and execute the selected command
    pub async fn run() -> Result<()> {
        let cli = Cli::parse();

        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .init();

        let config = SupervisorConfig::load(cli.config.as_deref())?;

        match cli.command {
            Commands::Run { json } => run_once(&config, json).await,
            Commands::Watch { interval } => watch(&config, interval).await,
            Commands::Scan => scan(&config),
        }
    }
}

/// Run one supervision cycle and print the report
async fn run_once(config: &SupervisorConfig, json: bool) -> Result<()> {
    let mut scanner = SystemScanner::new();
    let terminator = SignalTerminator;
    let manager = Pm2Client::new(&config.pm2_path);

    let report = run_supervision_cycle(config, &mut scanner, &terminator, &manager).await;

    if json {
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|e| VigilError::SerializationError(e.to_string()))?;
        println!("{}", rendered);
    } else {
        output::print_report(&report);
    }

    Ok(())
}

/// Run cycles on a timer until Ctrl-C flips the shutdown flag
async fn watch(config: &SupervisorConfig, interval: Option<u64>) -> Result<()> {
    let interval = interval
        .map(Duration::from_secs)
        .unwrap_or_else(|| config.check_interval());

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    ctrlc::set_handler(move || {
        flag.store(false, Ordering::SeqCst);
    })
    .ok();

    let mut scanner = SystemScanner::new();
    let terminator = SignalTerminator;
    let manager = Pm2Client::new(&config.pm2_path);

    output::print_info(&format!(
        "Watching service '{}' every {}s (Ctrl-C to stop)",
        config.service_name,
        interval.as_secs()
    ));

    while running.load(Ordering::SeqCst) {
        let spinner = output::cycle_spinner();
        let report = run_supervision_cycle(config, &mut scanner, &terminator, &manager).await;
        spinner.finish_and_clear();

        output::print_cycle_line(&report);

        tokio::time::sleep(interval).await;
    }

    output::print_info("Watch stopped");
    Ok(())
}

/// Snapshot and classify only; no termination, no restarts
fn scan(config: &SupervisorConfig) -> Result<()> {
    let mut scanner = SystemScanner::new();
    let snapshot = scanner.snapshot();
    let classified = Classifier::new(config).classify(&snapshot);

    output::print_classified(&classified);
    Ok(())
}
