//! Source archive path recognition.
//!
//! Parses paths like `123/5d5892d3-1f74-4ccf-91af-548dfc9767aa/20240101120000-abc123`
//! into named components:
//! - `org_id`: `123`
//! - `cluster_id`: `5d5892d3-1f74-4ccf-91af-548dfc9767aa` (36 characters)
//! - `archive`: `20240101120000-abc123`
//! - `timestamp`: `20240101120000`, split into `year`, `month`, `day` and `time`
//! - `id`: `abc123`
//!
//! Matching is anchored at the start of the path only, so trailing content
//! such as a file extension is accepted and ignored.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

/// Declarative definition of the source archive layout.
///
/// The character classes keep their literal commas (`[0-9,a-z,-]`,
/// `[a-z,A-Z,0-9]`), which historically admitted `,` in cluster and file ids.
pub const ARCHIVE_PATTERN: &str = concat!(
    r"^(?P<org_id>[0-9]+)/",
    r"(?P<cluster_id>[0-9,a-z,-]{36})/",
    r"(?P<archive>",
    r"(?P<timestamp>",
    r"(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})(?P<time>[0-9]{6}))",
    r"-(?P<id>[a-z,A-Z,0-9]*))",
);

/// Names of every component produced by a successful match.
pub const COMPONENT_NAMES: [&str; 9] = [
    "org_id",
    "cluster_id",
    "archive",
    "timestamp",
    "year",
    "month",
    "day",
    "time",
    "id",
];

fn archive_regex() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(ARCHIVE_PATTERN).expect("archive pattern is valid"))
}

/// Fields extracted from a source archive path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveComponents {
    pub org_id: String,
    pub cluster_id: String,
    pub archive: String,
    pub timestamp: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub time: String,
    pub id: String,
}

impl ArchiveComponents {
    /// Look up a component by its field name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "org_id" => &self.org_id,
            "cluster_id" => &self.cluster_id,
            "archive" => &self.archive,
            "timestamp" => &self.timestamp,
            "year" => &self.year,
            "month" => &self.month,
            "day" => &self.day,
            "time" => &self.time,
            "id" => &self.id,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Iterate over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        COMPONENT_NAMES
            .iter()
            .filter_map(move |name| self.get(name).map(|value| (*name, value)))
    }

    fn from_captures(captures: &Captures<'_>) -> Self {
        let group = |name: &str| {
            captures
                .name(name)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default()
        };
        Self {
            org_id: group("org_id"),
            cluster_id: group("cluster_id"),
            archive: group("archive"),
            timestamp: group("timestamp"),
            year: group("year"),
            month: group("month"),
            day: group("day"),
            time: group("time"),
            id: group("id"),
        }
    }
}

/// Outcome of matching a path against [`ARCHIVE_PATTERN`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathMatch {
    Matched(ArchiveComponents),
    NoMatch,
}

impl PathMatch {
    pub fn is_match(&self) -> bool {
        matches!(self, PathMatch::Matched(_))
    }

    /// Convert into an `Option`, discarding the no-match marker.
    pub fn into_components(self) -> Option<ArchiveComponents> {
        match self {
            PathMatch::Matched(components) => Some(components),
            PathMatch::NoMatch => None,
        }
    }
}

/// Matcher for source archive paths.
pub struct ArchivePath;

impl ArchivePath {
    /// Match `path` against the archive layout.
    ///
    /// # Examples
    ///
    /// ```
    /// use archive_relocate::archive::{ArchivePath, PathMatch};
    ///
    /// let m = ArchivePath::parse("42/5d5892d3-1f74-4ccf-91af-548dfc9767aa/20230914093000-ff01");
    /// let PathMatch::Matched(c) = m else { panic!("should match") };
    /// assert_eq!(c.org_id, "42");
    /// assert_eq!(c.time, "093000");
    ///
    /// assert_eq!(ArchivePath::parse("not-a-valid-path"), PathMatch::NoMatch);
    /// ```
    pub fn parse(path: &str) -> PathMatch {
        match archive_regex().captures(path) {
            Some(captures) => PathMatch::Matched(ArchiveComponents::from_captures(&captures)),
            None => PathMatch::NoMatch,
        }
    }
}

impl fmt::Display for ArchiveComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.org_id, self.cluster_id, self.archive)
    }
}
