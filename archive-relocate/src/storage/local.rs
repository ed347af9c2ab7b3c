//! Filesystem-backed object store.

use super::{ensure_regular_file, UploadError, Uploader};
use crate::log::{Logger, NoOpLogger};
use crate::log_debug;
use std::fmt;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

const COMPONENT: &str = "storage";

/// Uploader that copies archives into `<root>/<bucket>/<target_path>`.
#[derive(Clone)]
pub struct LocalDirUploader {
    root: PathBuf,
    logger: Arc<dyn Logger>,
}

impl LocalDirUploader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            logger: Arc::new(NoOpLogger),
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Destination of an object, rejecting keys that would escape the root.
    pub fn object_path(&self, bucket: &str, target_path: &str) -> Result<PathBuf, UploadError> {
        let key = Path::new(target_path);
        let escapes = key
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if bucket.is_empty() || bucket.contains('/') || escapes || target_path.is_empty() {
            return Err(UploadError::Request(format!(
                "invalid object key '{}/{}'",
                bucket, target_path
            )));
        }
        Ok(self.root.join(bucket).join(key))
    }
}

impl Uploader for LocalDirUploader {
    fn upload_file(
        &self,
        local_path: &Path,
        bucket: &str,
        target_path: &str,
    ) -> Result<(), UploadError> {
        ensure_regular_file(local_path)?;
        let destination = self.object_path(bucket, target_path)?;

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|source| UploadError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(local_path, &destination).map_err(|source| UploadError::Io {
            path: destination.clone(),
            source,
        })?;
        log_debug!(
            self.logger,
            COMPONENT,
            "Copied {} into local store at {}",
            local_path.display(),
            destination.display()
        );
        Ok(())
    }
}

impl fmt::Debug for LocalDirUploader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalDirUploader")
            .field("root", &self.root)
            .finish()
    }
}
