//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;
use crate::template::SlicedTemplate;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [storage] section
    if let Some(section) = ini.section(Some("storage")) {
        if let Some(v) = section.get("endpoint") {
            config.storage.endpoint = non_empty(v);
        }
        if let Some(v) = section.get("access_key") {
            config.storage.access_key = non_empty(v);
        }
        if let Some(v) = section.get("secret_key") {
            config.storage.secret_key = non_empty(v);
        }
        if let Some(v) = section.get("region") {
            let v = v.trim();
            if !v.is_empty() {
                config.storage.region = v.to_string();
            }
        }
        if let Some(v) = section.get("bucket") {
            config.storage.bucket = non_empty(v);
        }
        if let Some(v) = section.get("force_path_style") {
            config.storage.force_path_style = parse_bool(v);
        }
    }

    // [archive] section
    if let Some(section) = ini.section(Some("archive")) {
        if let Some(v) = section.get("path_prefix") {
            config.archive.path_prefix = non_empty(v.trim().trim_matches('/'));
        }
        if let Some(v) = section.get("name_pattern") {
            let v = v.trim();
            if !v.is_empty() {
                SlicedTemplate::parse(v).map_err(|e| ConfigFileError::InvalidValue {
                    section: "archive".to_string(),
                    key: "name_pattern".to_string(),
                    value: v.to_string(),
                    reason: e.to_string(),
                })?;
                config.archive.name_pattern = v.to_string();
            }
        }
    }

    // [metrics] section
    if let Some(section) = ini.section(Some("metrics")) {
        if let Some(v) = section.get("enabled") {
            config.metrics.enabled = parse_bool(v);
        }
        if let Some(v) = section.get("port") {
            config.metrics.port = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "metrics".to_string(),
                key: "port".to_string(),
                value: v.to_string(),
                reason: "must be an integer between 1024 and 65535".to_string(),
            })?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("level") {
            config.logging.level = v.parse().map_err(|_| ConfigFileError::InvalidValue {
                section: "logging".to_string(),
                key: "level".to_string(),
                value: v.to_string(),
                reason: "must be one of: trace, debug, info, warn, error".to_string(),
            })?;
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            config.logging.directory = (!v.is_empty()).then(|| expand_tilde(v));
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// Parse a boolean value from config.
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
