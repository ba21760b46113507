use std::fmt;

use chrono::Local;

/// Length of a release identifier: `YYYYMMDDHHMMSS`.
pub const RELEASE_ID_LEN: usize = 14;

/// Wall-clock release identifier. The digit-only format makes
/// lexicographic order equal chronological order, which the
/// pruning planner relies on.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseId(String);

impl ReleaseId {
    /// Allocate an identifier from the current local time.
    #[must_use]
    pub fn now() -> Self {
        Self(Local::now().format("%Y%m%d%H%M%S").to_string())
    }

    /// Accept a directory name as a release identifier if it
    /// has the canonical shape. Anything else under the
    /// releases root is foreign and left alone.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        if name.len() == RELEASE_ID_LEN && name.bytes().all(|b| b.is_ascii_digit()) {
            Some(Self(name.to_string()))
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Decide which release directories to delete: keep the `keep`
/// newest by identifier, never the one the current alias points
/// at. Entries that do not parse as release identifiers are
/// ignored entirely. Returns doomed names, newest first.
#[must_use]
pub fn plan_prune(entries: &[String], keep: usize, current: Option<&str>) -> Vec<String> {
    let mut releases: Vec<ReleaseId> = entries
        .iter()
        .filter_map(|name| ReleaseId::parse(name))
        .collect();
    releases.sort_unstable_by(|a, b| b.cmp(a));

    releases
        .into_iter()
        .skip(keep)
        .filter(|id| current != Some(id.as_str()))
        .map(|id| id.0)
        .collect()
}
