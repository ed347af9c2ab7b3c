//! CLI runner for common setup.
//!
//! Encapsulates configuration loading and logging initialization so command
//! handlers start from a ready environment.

use crate::error::CliError;
use archive_relocate::config::{config_file_path, ConfigFile};
use archive_relocate::logging::{init_logging, LoggingGuard};
use std::path::{Path, PathBuf};
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    config_path: PathBuf,
}

impl CliRunner {
    /// Load the config at `config_path` (or the default path) and start logging.
    pub fn new(config_path: Option<&Path>) -> Result<Self, CliError> {
        let config_path = resolve_config_path(config_path);
        let config = ConfigFile::load_from(&config_path)?;

        let logging_guard =
            init_logging(&config.logging).map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
            config_path,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("archive-relocate v{}", archive_relocate::VERSION);
        info!(
            config = %self.config_path.display(),
            "archive-relocate CLI: {} command", command
        );
    }
}

/// Explicit path if given, otherwise `~/.archive-relocate/config.ini`.
pub fn resolve_config_path(config_path: Option<&Path>) -> PathBuf {
    config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(config_file_path)
}
