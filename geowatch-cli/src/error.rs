//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::process;

use geowatch::config::{ConfigError, ConfigFileError};
use geowatch::region::CatalogError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Config file could not be read or parsed
    Config(ConfigFileError),
    /// An explicitly requested config file does not exist
    ConfigNotFound(PathBuf),
    /// Regions in the config file do not form a valid catalog
    Catalog(CatalogError),
    /// Engine settings rejected
    Engine(ConfigError),
    /// Failed to read a track file
    TrackRead { path: PathBuf, error: io::Error },
    /// Malformed line in a track file
    TrackParse {
        path: PathBuf,
        line: usize,
        reason: String,
    },
    /// Invalid command-line argument
    InvalidArgument(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        match self {
            CliError::ConfigNotFound(_) | CliError::Config(_) => {
                eprintln!();
                eprintln!("A config file looks like:");
                eprintln!("  [monitoring]");
                eprintln!("  capacity = 3");
                eprintln!();
                eprintln!("  [region.cafe]");
                eprintln!("  latitude = 50.4761");
                eprintln!("  longitude = 30.4979");
                eprintln!("  radius = 100");
                eprintln!("  min_dwell = 5m");
            }
            CliError::TrackParse { .. } => {
                eprintln!();
                eprintln!("Track files hold one 'latitude,longitude,seconds' sample per line,");
                eprintln!("where seconds is the time since the previous sample.");
                eprintln!("Lines starting with '#' are ignored.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::ConfigNotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            CliError::Catalog(e) => write!(f, "Invalid region catalog: {}", e),
            CliError::Engine(e) => write!(f, "Invalid engine settings: {}", e),
            CliError::TrackRead { path, error } => {
                write!(f, "Failed to read track '{}': {}", path.display(), error)
            }
            CliError::TrackParse { path, line, reason } => {
                write!(f, "{}:{}: {}", path.display(), line, reason)
            }
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Catalog(e) => Some(e),
            CliError::Engine(e) => Some(e),
            CliError::TrackRead { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<CatalogError> for CliError {
    fn from(e: CatalogError) -> Self {
        CliError::Catalog(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Engine(e)
    }
}
