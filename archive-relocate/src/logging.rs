//! Logging bootstrap for the CLI and host applications.
//!
//! Sets up a global `tracing` subscriber with:
//! - console output on stderr, leaving stdout to command results
//! - an optional log file (cleared on start) through a non-blocking writer
//! - filtering from `RUST_LOG`, falling back to the configured level

use crate::config::LoggingSettings;
use crate::log::LogLevel;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Errors raised while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to prepare log file {}: {source}", .path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard flushes and closes the log file writer.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

impl LoggingGuard {
    /// Whether a log file is being written.
    pub fn has_file(&self) -> bool {
        self._file_guard.is_some()
    }
}

/// Install the global subscriber described by `settings`.
pub fn init_logging(settings: &LoggingSettings) -> Result<LoggingGuard, LoggingError> {
    let (file_layer, file_guard) = match settings.directory.as_deref() {
        Some(dir) => {
            prepare_log_file(dir, &settings.file)?;
            let appender = tracing_appender::rolling::never(dir, &settings.file);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false);

    tracing_subscriber::registry()
        .with(env_filter(settings.level))
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInitialized)?;

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}

/// `RUST_LOG` if set and valid, otherwise `level`.
fn env_filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

fn default_directive(level: LogLevel) -> String {
    level.to_string()
}

/// Create the log directory and truncate the log file.
fn prepare_log_file(dir: &Path, file: &str) -> Result<PathBuf, LoggingError> {
    let path = dir.join(file);
    let wrap = |source| LoggingError::LogFile {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(wrap)?;
    fs::write(&path, "").map_err(wrap)?;
    Ok(path)
}
