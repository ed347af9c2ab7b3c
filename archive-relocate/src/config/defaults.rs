//! Default values and the `ConfigFile::default()` implementation.

use super::settings::*;
use crate::log::LogLevel;
use crate::metrics::MetricsPort;
use crate::storage::DEFAULT_REGION;

/// Target path template used when none is configured.
pub const DEFAULT_ARCHIVE_NAME_PATTERN: &str =
    "$cluster_id[:2]/$cluster_id/$year$month/$day/$time.tar.gz";

/// Log level used when neither the config nor `RUST_LOG` set one.
pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

/// Log file name inside the configured log directory.
pub const DEFAULT_LOG_FILE: &str = "archive-relocate.log";

/// Environment variable overriding `[storage] access_key`.
pub const ACCESS_KEY_ENV: &str = "ARCHIVE_RELOCATE_ACCESS_KEY";

/// Environment variable overriding `[storage] secret_key`.
pub const SECRET_KEY_ENV: &str = "ARCHIVE_RELOCATE_SECRET_KEY";

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            endpoint: None,
            access_key: None,
            secret_key: None,
            region: DEFAULT_REGION.to_string(),
            bucket: None,
            force_path_style: true,
        }
    }
}

impl Default for ArchiveSettings {
    fn default() -> Self {
        Self {
            path_prefix: None,
            name_pattern: DEFAULT_ARCHIVE_NAME_PATTERN.to_string(),
        }
    }
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            port: MetricsPort::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            directory: None,
            file: DEFAULT_LOG_FILE.to_string(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            storage: StorageSettings::default(),
            archive: ArchiveSettings::default(),
            metrics: MetricsSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}
