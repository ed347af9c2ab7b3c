//! The `init` command: write a commented default configuration file.

use std::path::Path;

use archive_relocate::config::ConfigFile;

use crate::error::CliError;
use crate::runner::resolve_config_path;

/// Run the init command.
pub fn run(config_path: Option<&Path>, force: bool) -> Result<(), CliError> {
    let path = resolve_config_path(config_path);
    if path.exists() && !force {
        return Err(CliError::AlreadyExists(path.display().to_string()));
    }

    ConfigFile::default().save_to(&path)?;
    println!("Wrote default configuration to {}", path.display());
    println!("Set [storage] bucket and credentials before running 'relocate'.");
    Ok(())
}
