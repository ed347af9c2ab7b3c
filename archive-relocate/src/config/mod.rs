//! INI configuration for the relocation pipeline.
//!
//! ```ini
//! [storage]
//! endpoint = https://s3.internal:9000
//! bucket = archives
//!
//! [archive]
//! name_pattern = $cluster_id[:2]/$cluster_id/$year$month/$day/$time.tar.gz
//! ```
//!
//! # Example
//!
//! ```
//! use archive_relocate::config::{ConfigFile, DEFAULT_ARCHIVE_NAME_PATTERN};
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.archive.name_pattern, DEFAULT_ARCHIVE_NAME_PATTERN);
//! assert_eq!(config.metrics.port.get(), 8000);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::{
    ACCESS_KEY_ENV, DEFAULT_ARCHIVE_NAME_PATTERN, DEFAULT_LOG_FILE, DEFAULT_LOG_LEVEL,
    SECRET_KEY_ENV,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{ArchiveSettings, ConfigFile, LoggingSettings, MetricsSettings, StorageSettings};
