//! Frequency tables for non-numeric columns.

use indexmap::IndexMap;

use crate::config::AnalysisConfig;
use crate::types::{CategoricalStats, Value};

/// Label of the overflow bucket in top-N tables.
pub const OTHER_LABEL: &str = "Other";

/// Count stringified non-missing values, in first-seen order.
pub(crate) fn frequency_map(values: &[Value]) -> IndexMap<String, usize> {
    let mut freq = IndexMap::new();
    for value in values.iter().filter(|v| !v.is_missing()) {
        *freq.entry(value.to_string()).or_insert(0) += 1;
    }
    freq
}

/// Entries by count descending, ties broken by ascending label.
pub(crate) fn ranked(freq: &IndexMap<String, usize>) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = freq.iter().map(|(k, v)| (k.as_str(), *v)).collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

/// Keep the `n` most frequent labels and fold the rest into `"Other"`.
///
/// Totals are preserved: a real `"Other"` label among the kept entries
/// absorbs the overflow, and a zero overflow adds no bucket.
pub(crate) fn top_n_with_other(
    freq: &IndexMap<String, usize>,
    n: usize,
) -> IndexMap<String, usize> {
    let entries = ranked(freq);
    let (kept, rest) = entries.split_at(n.min(entries.len()));

    let mut out: IndexMap<String, usize> =
        kept.iter().map(|(k, v)| (k.to_string(), *v)).collect();
    let remainder: usize = rest.iter().map(|(_, v)| v).sum();
    if remainder > 0 {
        *out.entry(OTHER_LABEL.to_string()).or_insert(0) += remainder;
    }
    out
}

/// True when there are at least two categories and the largest one holds
/// more than `threshold` of all values.
pub(crate) fn is_highly_imbalanced(freq: &IndexMap<String, usize>, threshold: f64) -> bool {
    if freq.len() <= 1 {
        return false;
    }
    let total: usize = freq.values().sum();
    let max = freq.values().copied().max().unwrap_or(0);
    max as f64 / total as f64 > threshold
}

pub(crate) fn categorical_stats(values: &[Value], config: &AnalysisConfig) -> CategoricalStats {
    let frequencies = frequency_map(values);
    let top_with_other = top_n_with_other(&frequencies, config.chart_top_categories);
    let imbalanced = is_highly_imbalanced(&frequencies, config.imbalance_threshold);
    CategoricalStats {
        frequencies,
        top_with_other,
        imbalanced,
    }
}
