//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! Produces the commented representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let endpoint = config.storage.endpoint.as_deref().unwrap_or("");
    let access_key = config.storage.access_key.as_deref().unwrap_or("");
    let secret_key = config.storage.secret_key.as_deref().unwrap_or("");
    let bucket = config.storage.bucket.as_deref().unwrap_or("");
    let path_prefix = config.archive.path_prefix.as_deref().unwrap_or("");
    let log_directory = config
        .logging
        .directory
        .as_ref()
        .map(|p| path_to_string(p))
        .unwrap_or_default();

    format!(
        r#"[storage]
; S3-compatible endpoint URL (empty = AWS)
; Example: endpoint = https://s3.internal:9000
endpoint = {}
; Credentials. ARCHIVE_RELOCATE_ACCESS_KEY and ARCHIVE_RELOCATE_SECRET_KEY
; take precedence when set in the environment
access_key = {}
secret_key = {}
; Signing region (default: us-east-1)
region = {}
; Destination bucket for relocated archives
bucket = {}
; Path-style addressing, required by Ceph and MinIO (default: true)
force_path_style = {}

[archive]
; Prefix prepended to every target path, without leading or trailing '/'
path_prefix = {}
; Target path template. Placeholders: $org_id $cluster_id $archive
; $timestamp $year $month $day $time $id, plus any broker key.
; A slice after a placeholder keeps part of its value: $cluster_id[:2]
name_pattern = {}

[metrics]
; Serve Prometheus metrics on /metrics (default: false)
enabled = {}
; Listening port, 1024-65535 (default: 8000)
port = {}

[logging]
; Minimum level when RUST_LOG is unset: trace, debug, info, warn, error
level = {}
; Directory for the log file (empty = console only)
directory = {}
; Log file name inside directory
file = {}
"#,
        endpoint,
        access_key,
        secret_key,
        config.storage.region,
        bucket,
        config.storage.force_path_style,
        path_prefix,
        config.archive.name_pattern,
        config.metrics.enabled,
        config.metrics.port,
        config.logging.level,
        log_directory,
        config.logging.file,
    )
}

fn path_to_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parser::parse_ini;
    use ini::Ini;
    use std::path::PathBuf;

    #[test]
    fn test_default_config_reparses_to_defaults() {
        let text = to_config_string(&ConfigFile::default());
        let reparsed = parse_ini(&Ini::load_from_str(&text).unwrap()).unwrap();
        let default = ConfigFile::default();

        assert_eq!(reparsed.archive, default.archive);
        assert_eq!(reparsed.metrics, default.metrics);
        assert_eq!(reparsed.logging, default.logging);
        assert_eq!(reparsed.storage.region, default.storage.region);
        assert!(reparsed.storage.bucket.is_none());
    }

    #[test]
    fn test_written_values_are_preserved() {
        let mut config = ConfigFile::default();
        config.storage.bucket = Some("archives".to_string());
        config.storage.endpoint = Some("http://localhost:9000".to_string());
        config.archive.path_prefix = Some("incoming".to_string());
        config.archive.name_pattern = "${org_id}/$archive.tgz".to_string();
        config.logging.directory = Some(PathBuf::from("/var/log/relocate"));

        let text = to_config_string(&config);
        let reparsed = parse_ini(&Ini::load_from_str(&text).unwrap()).unwrap();

        assert_eq!(reparsed.storage.bucket.as_deref(), Some("archives"));
        assert_eq!(reparsed.storage.endpoint.as_deref(), Some("http://localhost:9000"));
        assert_eq!(reparsed.archive, config.archive);
        assert_eq!(reparsed.logging.directory, config.logging.directory);
    }

    #[test]
    fn test_output_is_commented() {
        let text = to_config_string(&ConfigFile::default());
        assert!(text.contains("; Target path template"));
        assert!(text.contains("[metrics]"));
    }
}
