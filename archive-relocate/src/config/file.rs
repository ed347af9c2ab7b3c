//! Configuration file handling for ~/.archive-relocate/config.ini.
//!
//! Settings structs live in [`super::settings`], constants in [`super::defaults`],
//! parsing in [`super::parser`], and serialization in [`super::writer`].

use ini::Ini;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::defaults::{ACCESS_KEY_ENV, SECRET_KEY_ENV};
use super::settings::ConfigFile;
use crate::storage::S3Settings;

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },

    /// A required setting is absent
    #[error("Missing configuration: {section}.{key}")]
    Missing { section: String, key: String },

    /// Failed to create config directory
    #[error("Failed to create config directory: {0}")]
    DirectoryError(std::io::Error),
}

impl ConfigFile {
    /// Load configuration from the default path (~/.archive-relocate/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults. Credential environment
    /// variables are applied on top either way.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        let mut config = if path.exists() {
            let ini = Ini::load_from_file(path)?;
            super::parser::parse_ini(&ini)?
        } else {
            Self::default()
        };
        config.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Replace credentials with values from `lookup` where it has one.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |name| lookup(name).filter(|v| !v.trim().is_empty());
        if let Some(v) = non_empty(ACCESS_KEY_ENV) {
            self.storage.access_key = Some(v);
        }
        if let Some(v) = non_empty(SECRET_KEY_ENV) {
            self.storage.secret_key = Some(v);
        }
    }

    /// Save configuration to the default path (~/.archive-relocate/config.ini).
    pub fn save(&self) -> Result<(), ConfigFileError> {
        self.save_to(&config_file_path())
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ConfigFileError::DirectoryError)?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Create the default config file if it doesn't exist.
    ///
    /// Returns the path to the config file.
    pub fn ensure_exists() -> Result<PathBuf, ConfigFileError> {
        let path = config_file_path();
        if !path.exists() {
            Self::default().save_to(&path)?;
        }
        Ok(path)
    }

    /// Destination bucket, which has no sensible default.
    pub fn bucket(&self) -> Result<&str, ConfigFileError> {
        self.storage
            .bucket
            .as_deref()
            .ok_or_else(|| missing("storage", "bucket"))
    }

    /// Connection settings for [`crate::storage::S3Uploader`].
    pub fn s3_settings(&self) -> Result<S3Settings, ConfigFileError> {
        let access_key = self
            .storage
            .access_key
            .clone()
            .ok_or_else(|| missing("storage", "access_key"))?;
        let secret_key = self
            .storage
            .secret_key
            .clone()
            .ok_or_else(|| missing("storage", "secret_key"))?;

        let mut settings = S3Settings::new(self.storage.endpoint.clone(), access_key, secret_key)
            .with_region(self.storage.region.clone());
        settings.force_path_style = self.storage.force_path_style;
        Ok(settings)
    }
}

fn missing(section: &str, key: &str) -> ConfigFileError {
    ConfigFileError::Missing {
        section: section.to_string(),
        key: key.to_string(),
    }
}

/// Get the path to the config directory (~/.archive-relocate).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".archive-relocate")
}

/// Get the path to the config file (~/.archive-relocate/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
