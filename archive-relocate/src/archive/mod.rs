//! Archive path handling.
//!
//! Archives arrive under source paths of the form
//! `<org_id>/<cluster_id>/<year><month><day><time>-<id>`. The [`pattern`]
//! module recognises that layout and splits it into named components.

mod pattern;

pub use pattern::{ArchiveComponents, ArchivePath, PathMatch, ARCHIVE_PATTERN, COMPONENT_NAMES};
