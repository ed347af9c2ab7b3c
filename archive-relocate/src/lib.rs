//! archive-relocate - relocation of retrieved archives into an object store
//!
//! One stage of an ingestion pipeline. Given the broker of the current
//! message and a local copy of its archive, the stage checks the archive's
//! source path against a fixed naming layout, renders a new target path from
//! a template, uploads the archive there and reports where it went.
//!
//! ```
//! use archive_relocate::broker::Broker;
//! use archive_relocate::relocate::{RelocateStage, StageConfig};
//! use archive_relocate::storage::LocalDirUploader;
//! use std::sync::Arc;
//!
//! # let dir = tempfile::tempdir().unwrap();
//! # let archive = dir.path().join("archive.tgz");
//! # std::fs::write(&archive, b"data").unwrap();
//! let stage = RelocateStage::new(
//!     StageConfig::new("archives"),
//!     Arc::new(LocalDirUploader::new(dir.path().join("store"))),
//! );
//!
//! let mut broker = Broker::new();
//! broker.set(
//!     "s3_path",
//!     "123/5d5892d3-1f74-4ccf-91af-548dfc9767aa/20240101120000-xyz123",
//! );
//!
//! let report = stage.process(&mut broker, &archive)?;
//! assert!(report.contains("5d/5d5892d3-1f74-4ccf-91af-548dfc9767aa/202401/01/120000.tar.gz"));
//! # Ok::<(), archive_relocate::error::RelocateError>(())
//! ```

pub mod archive;
pub mod broker;
pub mod config;
pub mod error;
pub mod log;
pub mod logging;
pub mod metrics;
pub mod observer;
pub mod relocate;
pub mod storage;
pub mod template;

/// Version of the library and CLI, synchronized across the workspace.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
