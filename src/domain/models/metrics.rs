//! Test-count metrics and percentage pairs.
//!
//! A TestRail plan or run summary carries one `<status>_count` field per
//! status bucket. These are folded into a [`Metrics`] triple and then into
//! a rounded [`PercentagePair`].

use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Suffix shared by every status bucket field.
pub const COUNT_SUFFIX: &str = "_count";

/// Bucket holding passed tests.
pub const PASSED_FIELD: &str = "passed_count";

/// Bucket holding tests that were never executed.
pub const UNTESTED_FIELD: &str = "untested_count";

/// Totals derived from one record, or summed across many.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub total: u64,
    pub executed: u64,
    pub passed: u64,
}

impl Add for Metrics {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            total: self.total.saturating_add(rhs.total),
            executed: self.executed.saturating_add(rhs.executed),
            passed: self.passed.saturating_add(rhs.passed),
        }
    }
}

impl Sum for Metrics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Coverage and pass rate, both whole percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentagePair {
    pub coverage: u8,
    pub pass_rate: u8,
}

impl PercentagePair {
    pub const fn new(coverage: u8, pass_rate: u8) -> Self {
        Self {
            coverage,
            pass_rate,
        }
    }

    /// Percentages of `metrics.total`; an empty milestone yields `0/0`.
    pub fn from_metrics(metrics: Metrics) -> Self {
        if metrics.total == 0 {
            return Self::default();
        }
        Self {
            coverage: percent_of(metrics.executed, metrics.total),
            pass_rate: percent_of(metrics.passed, metrics.total),
        }
    }
}

fn percent_of(part: u64, total: u64) -> u8 {
    let pct = (part as f64 / total as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as u8
}

/// Fold a single plan or run record into a [`Metrics`] triple.
///
/// Every `*_count` field contributes to `total`. Missing or non-numeric
/// values count as zero; a non-object record yields all zeroes. Sums
/// saturate at `u64::MAX`.
pub fn calculate_metrics(record: &Value) -> Metrics {
    let Some(fields) = record.as_object() else {
        return Metrics::default();
    };

    let total = fields
        .iter()
        .filter(|(key, _)| key.ends_with(COUNT_SUFFIX))
        .map(|(_, value)| count_value(value))
        .fold(0, u64::saturating_add);
    let passed = fields.get(PASSED_FIELD).map_or(0, count_value);
    let untested = fields.get(UNTESTED_FIELD).map_or(0, count_value);

    Metrics {
        total,
        executed: total.saturating_sub(untested),
        passed,
    }
}

fn count_value(value: &Value) -> u64 {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f > 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<u64>().unwrap_or(0),
        _ => 0,
    }
}
