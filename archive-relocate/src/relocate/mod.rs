//! The relocation stage.
//!
//! [`RelocateStage::process`] takes the broker of the current message and the
//! local copy of its archive, checks the source path against the archive
//! layout, renders the target path, uploads the archive and returns a JSON
//! [`UploadReport`].
//!
//! # Notifications
//!
//! Each call fires `pre_extract` once, then `watch_broker` once the source
//! path has been read. A path that does not match the archive layout fires
//! `on_engine_failure`; a completed upload fires `on_engine_success`.
//! Upload errors and a missing `s3_path` are returned to the caller without a
//! failure notification.
//!
//! # Broker cleanup
//!
//! After a successful upload `cluster_id` and `s3_path` are removed from the
//! broker. On any failure the broker is left as it was found; cleaning up is
//! then the caller's job.

mod report;

pub use report::{ReportMetadata, UploadReport};

use crate::archive::{ArchivePath, PathMatch};
use crate::broker::{Broker, CLUSTER_ID_KEY, S3_PATH_KEY};
use crate::config::{ArchiveSettings, DEFAULT_ARCHIVE_NAME_PATTERN};
use crate::error::RelocateError;
use crate::log::{Logger, NoOpLogger};
use crate::observer::{Observer, ObserverSet};
use crate::storage::Uploader;
use crate::template::{LayeredVars, SlicedTemplate, TemplateError, VariableSource};
use crate::{log_debug, log_info, log_warn};
use std::path::Path;
use std::sync::Arc;

const COMPONENT: &str = "relocate";

/// Where and under which name archives are stored.
#[derive(Debug, Clone)]
pub struct StageConfig {
    /// Destination bucket.
    pub bucket: String,
    /// Optional common prefix, written without a leading `/`.
    pub path_prefix: Option<String>,
    /// Target path template.
    pub template: SlicedTemplate,
}

impl StageConfig {
    /// Configuration with the default archive name pattern.
    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            path_prefix: None,
            template: default_template(),
        }
    }

    pub fn with_path_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.path_prefix = Some(prefix.into());
        self
    }

    /// Replace the target template, failing on a malformed one.
    pub fn with_template(mut self, template: &str) -> Result<Self, TemplateError> {
        self.template = SlicedTemplate::parse(template)?;
        Ok(self)
    }

    /// Build from the `[archive]` section and the destination bucket.
    pub fn from_settings(
        bucket: impl Into<String>,
        archive: &ArchiveSettings,
    ) -> Result<Self, TemplateError> {
        Ok(Self {
            bucket: bucket.into(),
            path_prefix: archive.path_prefix.clone(),
            template: SlicedTemplate::parse(&archive.name_pattern)?,
        })
    }

    /// Render the template and join it to the prefix, if one is set.
    pub fn target_path(&self, vars: &dyn VariableSource) -> String {
        let path = self.template.safe_substitute(vars);
        match self.path_prefix.as_deref() {
            Some(prefix) if !prefix.is_empty() => format!("{}/{}", prefix, path),
            _ => path,
        }
    }
}

fn default_template() -> SlicedTemplate {
    SlicedTemplate::parse(DEFAULT_ARCHIVE_NAME_PATTERN)
        .expect("default archive name pattern is valid")
}

/// Uploads retrieved archives under templated paths.
pub struct RelocateStage {
    config: StageConfig,
    uploader: Arc<dyn Uploader>,
    observers: ObserverSet,
    logger: Arc<dyn Logger>,
}

impl RelocateStage {
    pub fn new(config: StageConfig, uploader: Arc<dyn Uploader>) -> Self {
        Self {
            config,
            uploader,
            observers: ObserverSet::new(),
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_observers(mut self, observers: ObserverSet) -> Self {
        self.observers = observers;
        self
    }

    /// Register one more observer after the existing ones.
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observers.register(observer);
        self
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    pub fn observers(&self) -> &ObserverSet {
        &self.observers
    }

    /// Relocate the archive at `local_path` and return the JSON report.
    pub fn process(&self, broker: &mut Broker, local_path: &Path) -> Result<String, RelocateError> {
        log_info!(self.logger, COMPONENT, "Processing {} for uploading", local_path.display());
        self.observers.notify(|o| o.pre_extract(&*broker, local_path));

        let s3_path = broker.require_str(S3_PATH_KEY)?.to_string();
        self.observers.notify(|o| o.watch_broker(&*broker));

        let components = match ArchivePath::parse(&s3_path) {
            PathMatch::Matched(components) => components,
            PathMatch::NoMatch => {
                log_warn!(
                    self.logger,
                    COMPONENT,
                    "The archive doesn't match the expected pattern: {}",
                    s3_path
                );
                let error = RelocateError::PatternMismatch { path: s3_path };
                self.observers.notify(|o| o.on_engine_failure(&*broker, &error));
                return Err(error);
            }
        };

        let report = {
            let vars = LayeredVars::new(&components, &*broker);
            let target_path = self.compute_target_path(&vars);

            log_info!(
                self.logger,
                COMPONENT,
                "Uploading archive '{}' as {}/{}",
                s3_path,
                self.config.bucket,
                target_path
            );
            self.uploader
                .upload_file(local_path, &self.config.bucket, &target_path)?;
            log_info!(
                self.logger,
                COMPONENT,
                "Uploaded archive '{}' as {}/{}",
                s3_path,
                self.config.bucket,
                target_path
            );

            UploadReport::new(target_path, s3_path, ReportMetadata::from_vars(&vars))
        };

        log_debug!(self.logger, COMPONENT, "Generated report: {:?}", report);
        let json = report.to_json()?;
        self.observers.notify(|o| o.on_engine_success(&*broker, &report));

        broker.delete(CLUSTER_ID_KEY);
        broker.delete(S3_PATH_KEY);
        Ok(json)
    }

    /// Render the target path for the given variables, applying the prefix.
    pub fn compute_target_path(&self, vars: &dyn VariableSource) -> String {
        self.config.target_path(vars)
    }
}
