//! Object store collaborators.
//!
//! The relocation stage only knows the [`Uploader`] trait. Two
//! implementations ship with the crate:
//!
//! - [`S3Uploader`] writes to an S3-compatible endpoint (Ceph, MinIO, AWS)
//! - [`LocalDirUploader`] copies into `<root>/<bucket>/<key>`, for dry runs
//!   and tests
//!
//! Uploads are synchronous: `upload_file` returns once the object is stored
//! or the attempt has failed. Retries, if any, belong to the implementation.

mod local;
mod s3;

pub use local::LocalDirUploader;
pub use s3::{S3Settings, S3Uploader, DEFAULT_REGION};

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures reported by an [`Uploader`].
#[derive(Debug, Error)]
pub enum UploadError {
    /// The local archive does not exist or is not a regular file
    #[error("local archive not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// Reading the archive or writing the destination failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The object store returned an error
    #[error("object store request failed: {0}")]
    Request(String),

    /// The uploader could not be set up
    #[error("failed to initialize uploader: {0}")]
    Setup(String),
}

/// Stores a local file in an object store under `bucket/target_path`.
pub trait Uploader: Send + Sync {
    fn upload_file(
        &self,
        local_path: &Path,
        bucket: &str,
        target_path: &str,
    ) -> Result<(), UploadError>;
}

pub(crate) fn ensure_regular_file(path: &Path) -> Result<(), UploadError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(UploadError::MissingFile(path.to_path_buf()))
    }
}
