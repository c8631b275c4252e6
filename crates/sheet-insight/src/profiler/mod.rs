//! Data profiling module for dataset analysis.
//!
//! This module turns a [`Dataset`] into a [`DatasetProfile`]:
//! - Type inference for each column
//! - Descriptive statistics, outliers and histograms for numeric columns
//! - Frequency tables for categorical columns
//! - Correlation across numeric columns
//! - Duplicate rows, empty cells and the quality score
//!
//! Columns are profiled independently (on the rayon pool when
//! `parallel` is set); correlation only starts once every column is done.

pub(crate) mod categorical;
pub(crate) mod correlation;
pub(crate) mod statistics;
mod type_inference;

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::quality::DataQualityAnalyzer;
use crate::types::{
    ColumnProfile, ColumnStats, ColumnType, Dataset, DatasetProfile, DateRange, Value,
};
use crate::utils::safe_ratio;

pub use categorical::OTHER_LABEL;
pub(crate) use categorical::ranked;
pub(crate) use type_inference::infer_column_type;

/// Data profiler for analyzing dataset structure and characteristics.
pub struct DataProfiler;

impl DataProfiler {
    /// Profile an entire dataset.
    ///
    /// An empty dataset yields the default (empty) profile.
    pub fn profile_dataset(dataset: &Dataset, config: &AnalysisConfig) -> DatasetProfile {
        if dataset.is_empty() {
            warn!("Dataset has no rows; returning an empty profile");
            return DatasetProfile::default();
        }

        info!(
            "Profiling dataset: {} rows x {} columns",
            dataset.row_count(),
            dataset.column_count()
        );

        let profile_one =
            |name: &String| Self::profile_column(name, dataset.column_values(name), config);
        let column_profiles: Vec<ColumnProfile> = if config.parallel {
            dataset.columns().par_iter().map(profile_one).collect()
        } else {
            dataset.columns().iter().map(profile_one).collect()
        };

        let numeric: Vec<&ColumnProfile> = column_profiles
            .iter()
            .filter(|p| p.inferred_type == ColumnType::Numeric)
            .collect();
        let correlation = correlation::correlation_matrix(&numeric, config);

        let duplicate_rows = DataQualityAnalyzer::find_duplicate_rows(dataset.rows());
        let empty_cell_count = DataQualityAnalyzer::count_empty_cells(dataset.rows());
        let empty_ratio = safe_ratio(
            empty_cell_count,
            dataset.row_count() * dataset.column_count(),
        );
        let duplicate_ratio = safe_ratio(duplicate_rows.len(), dataset.row_count());
        let quality_score =
            DataQualityAnalyzer::quality_score(empty_ratio, duplicate_ratio, config);

        debug!(
            "Quality: {} empty cells, {} duplicate rows, score {:.4}",
            empty_cell_count,
            duplicate_rows.len(),
            quality_score
        );

        DatasetProfile {
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            column_profiles,
            correlation,
            duplicate_rows,
            empty_cell_count,
            quality_score,
        }
    }

    /// Profile a single column from its raw values.
    pub fn profile_column(
        name: &str,
        raw_values: Vec<Value>,
        config: &AnalysisConfig,
    ) -> ColumnProfile {
        let inferred_type = infer_column_type(&raw_values, config);
        let non_null_values: Vec<Value> = raw_values
            .iter()
            .filter(|v| !v.is_missing())
            .cloned()
            .collect();
        let missing_count = raw_values.len() - non_null_values.len();
        let unique_count = non_null_values.iter().collect::<HashSet<_>>().len();

        let numbers = || -> Vec<f64> { non_null_values.iter().filter_map(Value::as_f64).collect() };
        let stats = match inferred_type {
            ColumnType::Empty => ColumnStats::Empty,
            ColumnType::Numeric => statistics::numeric_stats(numbers(), config)
                .map_or(ColumnStats::Empty, ColumnStats::Numeric),
            ColumnType::Date => {
                let serials = numbers();
                let min = serials.iter().copied().fold(f64::INFINITY, f64::min);
                let max = serials.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                if serials.is_empty() {
                    ColumnStats::Empty
                } else {
                    ColumnStats::Date(DateRange {
                        min_serial: min,
                        max_serial: max,
                    })
                }
            }
            ColumnType::IdText | ColumnType::Categorical => {
                ColumnStats::Categorical(categorical::categorical_stats(&non_null_values, config))
            }
        };

        debug!(
            "Profiled column '{}': {} ({} missing, {} unique)",
            name, inferred_type, missing_count, unique_count
        );

        ColumnProfile {
            name: name.to_string(),
            inferred_type,
            raw_values,
            non_null_values,
            missing_count,
            unique_count,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaPolicy;
    use crate::types::{Row, row};
    use pretty_assertions::assert_eq;

    fn dataset(rows: Vec<Row>) -> Dataset {
        Dataset::from_rows(rows, SchemaPolicy::Strict).unwrap()
    }

    fn age_dept() -> Dataset {
        dataset(
            [(20, "A"), (21, "A"), (20, "B"), (999, "A")]
                .into_iter()
                .map(|(age, dept)| row([("age", Value::from(age)), ("dept", Value::from(dept))]))
                .collect(),
        )
    }

    #[test]
    fn test_profile_age_dept() {
        let profile = DataProfiler::profile_dataset(&age_dept(), &AnalysisConfig::default());

        assert_eq!(profile.row_count, 4);
        assert_eq!(profile.column_count, 2);
        assert!(profile.duplicate_rows.is_empty());
        assert_eq!(profile.empty_cell_count, 0);
        assert_eq!(profile.quality_score, 1.0);

        let age = profile.column("age").unwrap();
        assert_eq!(age.inferred_type, ColumnType::Numeric);
        assert_eq!(age.unique_count, 3);

        let dept = profile.column("dept").unwrap();
        assert_eq!(dept.inferred_type, ColumnType::Categorical);
        let freq = &dept.categorical().unwrap().frequencies;
        assert_eq!(freq.get("A"), Some(&3));
        assert_eq!(freq.get("B"), Some(&1));
        assert_eq!(freq.len(), 2);
    }

    #[test]
    fn test_profile_empty_dataset() {
        let profile =
            DataProfiler::profile_dataset(&Dataset::default(), &AnalysisConfig::default());
        assert_eq!(profile, DatasetProfile::default());
    }

    #[test]
    fn test_profile_column_missing_and_unique() {
        let values = vec![
            Value::from("x"),
            Value::Null,
            Value::from(""),
            Value::from("x"),
            Value::from("y"),
        ];
        let p = DataProfiler::profile_column("c", values, &AnalysisConfig::default());
        assert_eq!(p.missing_count, 2);
        assert_eq!(p.unique_count, 2);
        assert_eq!(p.non_null_values.len(), 3);
        assert_eq!(p.inferred_type, ColumnType::Categorical);
        assert!((p.missing_ratio() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_profile_date_column_range() {
        let values: Vec<Value> = [45306.0, 45000.0, 45400.0].into_iter().map(Value::from).collect();
        let p = DataProfiler::profile_column("when", values, &AnalysisConfig::default());
        assert_eq!(p.inferred_type, ColumnType::Date);
        match p.stats {
            ColumnStats::Date(range) => {
                assert_eq!(range.min_serial, 45000.0);
                assert_eq!(range.max_serial, 45400.0);
            }
            other => panic!("expected date stats, got {other:?}"),
        }
    }

    #[test]
    fn test_profile_empty_column() {
        let p = DataProfiler::profile_column("e", vec![Value::Null; 3], &AnalysisConfig::default());
        assert_eq!(p.inferred_type, ColumnType::Empty);
        assert_eq!(p.stats, ColumnStats::Empty);
        assert_eq!(p.missing_count, 3);
    }

    #[test]
    fn test_profile_detects_duplicates_and_empties() {
        let rows = vec![
            row([("a", Value::from(1)), ("b", Value::Null)]),
            row([("a", Value::from(1)), ("b", Value::Null)]),
            row([("a", Value::from(2)), ("b", Value::from("x"))]),
            row([("a", Value::from(3)), ("b", Value::from("y"))]),
        ];
        let profile = DataProfiler::profile_dataset(&dataset(rows), &AnalysisConfig::default());
        assert_eq!(profile.duplicate_rows.len(), 1);
        assert_eq!(profile.empty_cell_count, 2);
        // 1 - (0.5 * 2/8 + 0.5 * 1/4)
        assert!((profile.quality_score - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_parallel_and_sequential_profiles_match() {
        let parallel = DataProfiler::profile_dataset(&age_dept(), &AnalysisConfig::default());
        let sequential = DataProfiler::profile_dataset(
            &age_dept(),
            &AnalysisConfig {
                parallel: false,
                ..AnalysisConfig::default()
            },
        );
        assert_eq!(parallel, sequential);
    }
}
