//! Errors surfaced by the relocation stage.

use crate::broker::BrokerError;
use crate::storage::UploadError;
use thiserror::Error;

/// Reasons a call to [`crate::relocate::RelocateStage::process`] can fail.
///
/// Only [`RelocateError::PatternMismatch`] is reported to observers through
/// `on_engine_failure`. The other variants propagate to the caller without a
/// notification.
#[derive(Debug, Error)]
pub enum RelocateError {
    /// The source path does not follow `<org_id>/<cluster_id>/<timestamp>-<id>`
    #[error("archive pattern name incorrect: '{path}'")]
    PatternMismatch { path: String },

    /// An upstream stage did not leave the expected keys in the broker
    #[error(transparent)]
    Broker(#[from] BrokerError),

    /// The object store rejected or failed the upload
    #[error("upload failed: {0}")]
    Upload(#[from] UploadError),

    /// The report could not be serialized
    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

impl RelocateError {
    /// True for the error that the stage reports to observers.
    pub fn is_pattern_mismatch(&self) -> bool {
        matches!(self, RelocateError::PatternMismatch { .. })
    }
}
