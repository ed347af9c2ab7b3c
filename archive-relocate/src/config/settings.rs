//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use crate::log::LogLevel;
use crate::metrics::MetricsPort;
use std::path::PathBuf;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    /// Object store connection and destination bucket
    pub storage: StorageSettings,
    /// Target path naming
    pub archive: ArchiveSettings,
    /// Prometheus endpoint
    pub metrics: MetricsSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Object store configuration.
#[derive(Clone)]
pub struct StorageSettings {
    /// Endpoint URL; empty means AWS
    pub endpoint: Option<String>,
    /// Access key ID
    pub access_key: Option<String>,
    /// Secret access key
    pub secret_key: Option<String>,
    /// Signing region
    pub region: String,
    /// Destination bucket
    pub bucket: Option<String>,
    /// Use path-style addressing
    pub force_path_style: bool,
}

impl std::fmt::Debug for StorageSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageSettings")
            .field("endpoint", &self.endpoint)
            .field("access_key", &self.access_key)
            .field("secret_key", &self.secret_key.as_ref().map(|_| "<redacted>"))
            .field("region", &self.region)
            .field("bucket", &self.bucket)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

/// Target path configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSettings {
    /// Prefix prepended to every target path
    pub path_prefix: Option<String>,
    /// Target path template
    pub name_pattern: String,
}

/// Metrics endpoint configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSettings {
    /// Serve `/metrics` at all
    pub enabled: bool,
    /// Listening port
    pub port: MetricsPort,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Minimum level when `RUST_LOG` is unset
    pub level: LogLevel,
    /// Directory for the log file; `None` logs to the console only
    pub directory: Option<PathBuf>,
    /// Log file name inside `directory`
    pub file: String,
}
