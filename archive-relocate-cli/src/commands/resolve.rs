//! The `resolve` command: show where an archive would go, without uploading.

use std::path::Path;

use archive_relocate::archive::{ArchivePath, PathMatch};
use archive_relocate::broker::{Broker, S3_PATH_KEY};
use archive_relocate::config::ConfigFile;
use archive_relocate::error::RelocateError;
use archive_relocate::relocate::{ReportMetadata, StageConfig};
use archive_relocate::template::LayeredVars;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Run the resolve command.
pub fn run(
    s3_path: &str,
    values: Vec<(String, String)>,
    config_path: Option<&Path>,
) -> Result<(), CliError> {
    let config = ConfigFile::load_from(&resolve_config_path(config_path))?;
    print!("{}", render(&config, s3_path, values)?);
    Ok(())
}

/// Components, target path and report metadata for `s3_path`.
fn render(
    config: &ConfigFile,
    s3_path: &str,
    values: Vec<(String, String)>,
) -> Result<String, CliError> {
    let components = match ArchivePath::parse(s3_path) {
        PathMatch::Matched(components) => components,
        PathMatch::NoMatch => {
            return Err(RelocateError::PatternMismatch {
                path: s3_path.to_string(),
            }
            .into())
        }
    };

    let bucket = config.storage.bucket.clone().unwrap_or_default();
    let stage_config = StageConfig::from_settings(bucket, &config.archive)?;

    let mut broker: Broker = values.into_iter().collect();
    broker.set(S3_PATH_KEY, s3_path);
    let vars = LayeredVars::new(&components, &broker);
    let metadata = ReportMetadata::from_vars(&vars);

    let mut out = String::new();
    for (name, value) in components.iter() {
        out.push_str(&format!("{:<10} {}\n", name, value));
    }
    out.push_str(&format!("{:<10} {}\n", "pattern", stage_config.template));
    out.push_str(&format!("{:<10} {}\n", "target", stage_config.target_path(&vars)));
    out.push_str(&format!(
        "{:<10} {}\n",
        "metadata",
        serde_json::to_string(&metadata).map_err(RelocateError::from)?
    ));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "123/5d5892d3-1f74-4ccf-91af-548dfc9767aa/20240101120000-xyz123";

    #[test]
    fn test_render_default_pattern() {
        let out = render(&ConfigFile::default(), SOURCE, Vec::new()).unwrap();
        assert!(out.contains("org_id     123\n"));
        assert!(out.contains("time       120000\n"));
        assert!(out.contains(
            "target     5d/5d5892d3-1f74-4ccf-91af-548dfc9767aa/202401/01/120000.tar.gz\n"
        ));
    }

    #[test]
    fn test_render_uses_extra_values() {
        let mut config = ConfigFile::default();
        config.archive.name_pattern = "$tenant/$id".to_string();
        let out = render(
            &config,
            SOURCE,
            vec![("tenant".to_string(), "acme".to_string())],
        )
        .unwrap();
        assert!(out.contains("target     acme/xyz123\n"));
    }

    #[test]
    fn test_render_rejects_mismatch() {
        let err = render(&ConfigFile::default(), "nope", Vec::new()).unwrap_err();
        assert!(matches!(err, CliError::Relocate(_)));
    }
}
