//! archive-relocate CLI - Command-line interface
//!
//! Drives the relocation stage for a single archive, previews target paths
//! and manages the configuration file.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::relocate::{parse_key_value, RelocateArgs};
use error::CliError;
use runner::CliRunner;

#[derive(Parser)]
#[command(name = "archive-relocate")]
#[command(version = archive_relocate::VERSION)]
#[command(about = "Relocate retrieved archives into an object store", long_about = None)]
struct Cli {
    /// Configuration file (default: ~/.archive-relocate/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a local archive under its templated target path
    ///
    /// Prints the JSON report on success.
    Relocate(RelocateArgs),

    /// Show the components and target path of a source path without uploading
    Resolve {
        /// Source path, e.g. 123/<cluster-uuid>/20240101120000-abc
        s3_path: String,

        /// Extra broker values as key=value, usable in the name pattern
        #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
        values: Vec<(String, String)>,
    },

    /// Write a default configuration file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Relocate(args) => {
            CliRunner::new(cli.config.as_deref()).and_then(|runner| commands::relocate::run(args, &runner))
        }
        Commands::Resolve { s3_path, values } => {
            commands::resolve::run(&s3_path, values, cli.config.as_deref())
        }
        Commands::Init { force } => commands::init::run(cli.config.as_deref(), force),
    };

    if let Err(e) = result {
        e.exit();
    }
}
