use std::collections::HashSet;

use crate::config::AnalysisConfig;
use crate::types::{Row, Value};

pub struct DataQualityAnalyzer;

impl DataQualityAnalyzer {
    /// Every row that repeats an earlier row, in encounter order.
    ///
    /// Rows are compared by content regardless of key order.
    pub fn find_duplicate_rows(rows: &[Row]) -> Vec<Row> {
        let mut seen: HashSet<Vec<(&str, &Value)>> = HashSet::with_capacity(rows.len());
        rows.iter()
            .filter(|row| {
                let mut key: Vec<(&str, &Value)> =
                    row.iter().map(|(k, v)| (k.as_str(), v)).collect();
                key.sort_by(|a, b| a.0.cmp(b.0));
                !seen.insert(key)
            })
            .cloned()
            .collect()
    }

    /// Cells that are null or blank.
    pub fn count_empty_cells(rows: &[Row]) -> usize {
        rows.iter()
            .flat_map(|row| row.values())
            .filter(|v| v.is_missing())
            .count()
    }

    /// `1 - (w_missing * empty_ratio + w_dup * duplicate_ratio)`, clamped to [0, 1].
    pub fn quality_score(
        empty_ratio: f64,
        duplicate_ratio: f64,
        config: &AnalysisConfig,
    ) -> f64 {
        let penalty =
            config.missing_weight * empty_ratio + config.duplicate_weight * duplicate_ratio;
        (1.0 - penalty).clamp(0.0, 1.0)
    }
}
