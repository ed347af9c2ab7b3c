//! The `relocate` command: one pass of the stage over a local archive.
//!
//! The command plays the part of the host pipeline. It builds the broker,
//! fires the consumer hooks around the stage and prints the JSON report.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use tracing::info;

use archive_relocate::broker::{Broker, CLUSTER_ID_KEY, S3_PATH_KEY};
use archive_relocate::log::{Logger, TracingLogger};
use archive_relocate::metrics::StatsObserver;
use archive_relocate::observer::{LoggingObserver, Observer, ObserverSet};
use archive_relocate::relocate::{RelocateStage, StageConfig};
use archive_relocate::storage::{LocalDirUploader, S3Uploader, Uploader};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for `archive-relocate relocate`.
#[derive(Debug, Args)]
pub struct RelocateArgs {
    /// Source path of the archive, e.g. 123/<cluster-uuid>/20240101120000-abc
    #[arg(long)]
    pub s3_path: String,

    /// Local copy of the archive to upload
    #[arg(long)]
    pub file: PathBuf,

    /// Cluster ID reported by the upstream stage
    #[arg(long)]
    pub cluster_id: Option<String>,

    /// Destination bucket (overrides [storage] bucket)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Copy into this directory instead of the configured object store
    #[arg(long)]
    pub local_store: Option<PathBuf>,

    /// Extra broker values as key=value, usable in the name pattern
    #[arg(long = "set", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub values: Vec<(String, String)>,
}

/// Parse a `key=value` pair.
pub fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got '{}'", raw)),
    }
}

/// Run the relocate command.
pub fn run(args: RelocateArgs, runner: &CliRunner) -> Result<(), CliError> {
    runner.log_startup("relocate");
    let config = runner.config();

    let bucket = match args.bucket {
        Some(bucket) => bucket,
        None => config.bucket()?.to_string(),
    };
    let stage_config = StageConfig::from_settings(bucket, &config.archive)?;

    let logger: Arc<dyn Logger> = Arc::new(TracingLogger::new());
    let uploader: Arc<dyn Uploader> = match &args.local_store {
        Some(dir) => {
            info!(root = %dir.display(), "Using local directory store");
            Arc::new(LocalDirUploader::new(dir).with_logger(logger.clone()))
        }
        None => {
            let settings = config.s3_settings()?;
            Arc::new(S3Uploader::new(&settings).map_err(CliError::Storage)?)
        }
    };

    let mut observers = ObserverSet::new().with(Arc::new(LoggingObserver::new(logger.clone())));
    if config.metrics.enabled {
        observers.register(Arc::new(StatsObserver::new(
            config.metrics.port,
            logger.clone(),
        )?));
    }

    let stage = RelocateStage::new(stage_config, uploader)
        .with_observers(observers.clone())
        .with_logger(logger);

    let mut broker = Broker::new();
    broker.set(S3_PATH_KEY, args.s3_path);
    if let Some(cluster_id) = args.cluster_id {
        broker.set(CLUSTER_ID_KEY, cluster_id);
    }
    for (key, value) in args.values {
        broker.set(key, value);
    }

    observers.notify(|o| o.on_recv(&broker));
    observers.notify(|o| o.on_download(&args.file));

    let report = match stage.process(&mut broker, &args.file) {
        Ok(report) => report,
        Err(e) => {
            observers.notify(|o| o.on_consumer_failure(&broker, &e));
            return Err(e.into());
        }
    };
    observers.notify(|o| o.on_process(&broker, &report));

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", report).map_err(CliError::Output)?;
    observers.notify(|o| o.on_consumer_success(&broker, &report));
    Ok(())
}
