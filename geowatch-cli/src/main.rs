//! GeoWatch CLI - Command-line interface
//!
//! Replays location tracks against a region catalog and inspects catalogs
//! and selections without a device.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use geowatch::config::config_directory;
use geowatch::logging::{default_log_dir, default_log_file, init_logging};

use commands::check::CheckArgs;
use commands::rank::RankArgs;
use commands::simulate::SimulateArgs;
use error::CliError;

#[derive(Parser)]
#[command(name = "geowatch")]
#[command(version)]
#[command(about = "Adaptive geofence monitoring, simulated", long_about = None)]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Directory for the log file (defaults to ~/.geowatch/logs)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a location track and print monitoring events
    Simulate(SimulateArgs),
    /// Show the region selection and expansion region for a location
    Rank(RankArgs),
    /// Validate a config file and list its regions
    Check(CheckArgs),
}

fn main() {
    let cli = Cli::parse();

    let log_dir = cli
        .log_dir
        .clone()
        .unwrap_or_else(|| config_directory().join(default_log_dir()));
    let level = if cli.verbose { "debug" } else { "info" };

    let _logging_guard = match init_logging(&log_dir, default_log_file(), level) {
        Ok(guard) => guard,
        Err(e) => CliError::LoggingInit(e.to_string()).exit(),
    };

    let result = match cli.command {
        Commands::Simulate(args) => commands::simulate::run(args),
        Commands::Rank(args) => commands::rank::run(args),
        Commands::Check(args) => commands::check::run(args),
    };

    if let Err(e) = result {
        e.exit();
    }
}
