//! Tracing setup for the library and the CLI.
//!
//! Every session starts a fresh log file under the log directory. Events go
//! to that file with full targets and to stderr in compact form, which keeps
//! stdout for the replay output. `RUST_LOG` takes precedence over the level
//! passed by the caller.

use std::fs;
use std::io;
use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Keeps the background file writer alive; buffered lines are flushed on drop.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Install the global subscriber writing to `log_dir/log_file` and stderr.
///
/// `default_level` is an `EnvFilter` directive used when `RUST_LOG` is unset.
/// Fails if the log file cannot be prepared or a subscriber is already set.
pub fn init_logging(
    log_dir: impl AsRef<Path>,
    log_file: &str,
    default_level: &str,
) -> Result<LoggingGuard, io::Error> {
    let log_dir = log_dir.as_ref();
    reset_log_file(log_dir, log_file)?;

    let (file_writer, file_guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(log_dir, log_file));

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_timer(LocalTime::rfc_3339())
                .with_target(true),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_timer(LocalTime::rfc_3339())
                .compact(),
        )
        .try_init()
        .map_err(io::Error::other)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// Create `log_dir` and truncate `log_file` inside it.
fn reset_log_file(log_dir: &Path, log_file: &str) -> io::Result<()> {
    fs::create_dir_all(log_dir)?;
    fs::File::create(log_dir.join(log_file))?;
    Ok(())
}

/// Log directory name, relative to the config directory.
pub fn default_log_dir() -> &'static str {
    "logs"
}

/// Log file name.
pub fn default_log_file() -> &'static str {
    "geowatch.log"
}
