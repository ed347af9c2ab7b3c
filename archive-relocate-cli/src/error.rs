//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use archive_relocate::config::ConfigFileError;
use archive_relocate::error::RelocateError;
use archive_relocate::metrics::MetricsError;
use archive_relocate::storage::UploadError;
use archive_relocate::template::TemplateError;
use std::fmt;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file could not be loaded or is incomplete
    Config(ConfigFileError),
    /// The configured name pattern is malformed
    Template(TemplateError),
    /// Failed to connect to the object store
    Storage(UploadError),
    /// Failed to start the metrics endpoint
    Metrics(MetricsError),
    /// The archive could not be relocated
    Relocate(RelocateError),
    /// Failed to write the report
    Output(std::io::Error),
    /// Refused to overwrite an existing file
    AlreadyExists(String),
}

impl CliError {
    /// Exit code for this error: 2 for usage and configuration problems,
    /// 1 for failures while doing the work.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_)
            | CliError::Template(_)
            | CliError::AlreadyExists(_) => 2,
            _ => 1,
        }
    }

    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        match self {
            CliError::Config(ConfigFileError::Missing { .. }) => {
                eprintln!();
                eprintln!("Create a configuration file with:");
                eprintln!("  archive-relocate init");
                eprintln!("then fill in the [storage] section.");
            }
            CliError::Relocate(e) if e.is_pattern_mismatch() => {
                eprintln!();
                eprintln!("Source paths must look like:");
                eprintln!("  <org_id>/<cluster_id>/<YYYYMMDDhhmmss>-<id>");
            }
            _ => {}
        }

        process::exit(self.exit_code())
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Template(e) => write!(f, "Invalid name pattern: {}", e),
            CliError::Storage(e) => write!(f, "Failed to set up object store: {}", e),
            CliError::Metrics(e) => write!(f, "Failed to start metrics endpoint: {}", e),
            CliError::Relocate(e) => write!(f, "Relocation failed: {}", e),
            CliError::Output(e) => write!(f, "Failed to write output: {}", e),
            CliError::AlreadyExists(path) => {
                write!(f, "'{}' already exists (use --force to overwrite)", path)
            }
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Template(e) => Some(e),
            CliError::Storage(e) => Some(e),
            CliError::Metrics(e) => Some(e),
            CliError::Relocate(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e)
    }
}

impl From<TemplateError> for CliError {
    fn from(e: TemplateError) -> Self {
        CliError::Template(e)
    }
}

impl From<RelocateError> for CliError {
    fn from(e: RelocateError) -> Self {
        CliError::Relocate(e)
    }
}

impl From<MetricsError> for CliError {
    fn from(e: MetricsError) -> Self {
        CliError::Metrics(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        let missing = CliError::Config(ConfigFileError::Missing {
            section: "storage".to_string(),
            key: "bucket".to_string(),
        });
        assert_eq!(missing.exit_code(), 2);

        let mismatch = CliError::Relocate(RelocateError::PatternMismatch {
            path: "x".to_string(),
        });
        assert_eq!(mismatch.exit_code(), 1);

        let exists = CliError::AlreadyExists("config.ini".to_string());
        assert_eq!(exists.exit_code(), 2);
    }

    #[test]
    fn test_display_wraps_library_errors() {
        let err = CliError::Relocate(RelocateError::PatternMismatch {
            path: "bad/path".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "Relocation failed: archive pattern name incorrect: 'bad/path'"
        );
    }
}
