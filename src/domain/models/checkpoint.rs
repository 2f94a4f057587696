//! Resumable checkpoint state and cross-pass averaging.
//!
//! A cycle walks every project once, possibly across many invocations.
//! Each processed milestone appends one [`PercentagePair`] per referenced
//! issue key; the published value for a key is the plain mean over all
//! pairs accumulated so far in the cycle.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::metrics::PercentagePair;

/// Issue key -> pairs accumulated since the cursor last wrapped to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuePercentages(BTreeMap<String, Vec<PercentagePair>>);

impl IssuePercentages {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mapping holding `pair` once for every key in `keys`.
    pub fn from_milestone(keys: &BTreeSet<String>, pair: PercentagePair) -> Self {
        Self(keys.iter().map(|key| (key.clone(), vec![pair])).collect())
    }

    /// Append `other`'s pairs after this mapping's pairs, key by key.
    ///
    /// Existing samples are never overwritten.
    #[must_use]
    pub fn merged(self, other: Self) -> Self {
        let mut merged = self.0;
        for (key, pairs) in other.0 {
            merged.entry(key).or_default().extend(pairs);
        }
        Self(merged)
    }

    pub fn get(&self, key: &str) -> Option<&[PercentagePair]> {
        self.0.get(key).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of issue keys tracked.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Total number of samples across every key.
    pub fn sample_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[PercentagePair])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Mean coverage and pass rate per key, skipping keys with no samples.
    pub fn averages(&self) -> BTreeMap<String, PercentagePair> {
        self.0
            .iter()
            .filter_map(|(key, pairs)| average(pairs).map(|avg| (key.clone(), avg)))
            .collect()
    }
}

impl FromIterator<(String, Vec<PercentagePair>)> for IssuePercentages {
    fn from_iter<I: IntoIterator<Item = (String, Vec<PercentagePair>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Rounded mean of a non-empty sample list.
pub fn average(pairs: &[PercentagePair]) -> Option<PercentagePair> {
    if pairs.is_empty() {
        return None;
    }
    let n = pairs.len() as f64;
    let coverage: u64 = pairs.iter().map(|p| u64::from(p.coverage)).sum();
    let pass_rate: u64 = pairs.iter().map(|p| u64::from(p.pass_rate)).sum();
    Some(PercentagePair::new(
        (coverage as f64 / n).round() as u8,
        (pass_rate as f64 / n).round() as u8,
    ))
}

/// Persisted resume point: cursor into the sorted project list plus the
/// samples gathered during the current cycle.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Checkpoint {
    pub last_index: usize,
    pub jira_percentages: IssuePercentages,
}

impl Checkpoint {
    /// Where a run over `project_count` projects should start.
    ///
    /// Returns the start index and the accumulated samples to build on. A
    /// cursor at or past the end wraps to 0, and starting at 0 begins a new
    /// cycle with no samples.
    pub fn resume(self, project_count: usize) -> (usize, IssuePercentages) {
        let start = if self.last_index >= project_count {
            0
        } else {
            self.last_index
        };
        if start == 0 {
            (0, IssuePercentages::new())
        } else {
            (start, self.jira_percentages)
        }
    }
}
