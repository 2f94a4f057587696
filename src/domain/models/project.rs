//! TestRail projects and milestones as seen by the sync job.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// A TestRail project. Only the id drives the job; the name is for logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
}

impl Project {
    /// Sort projects ascending by id so the resume cursor is stable across runs.
    pub fn sort_for_cursor(projects: &mut [Self]) {
        projects.sort_by_key(|p| p.id);
    }
}

/// A TestRail milestone and the issue keys it references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    /// Comma-separated issue keys, e.g. `"ABC-1, ABC-2"`.
    #[serde(default)]
    pub refs: Option<String>,
}

impl Milestone {
    /// The de-duplicated issue keys this milestone reports to.
    pub fn issue_keys(&self) -> BTreeSet<String> {
        self.refs.as_deref().map(parse_refs).unwrap_or_default()
    }
}

/// Split a refs string on commas, trim, drop empties and de-duplicate.
///
/// Keys are compared exactly; `ABC-1` and `abc-1` stay distinct.
pub fn parse_refs(refs: &str) -> BTreeSet<String> {
    refs.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}
