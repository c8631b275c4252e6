//! Pairwise Pearson correlation across numeric columns.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::config::{AnalysisConfig, CorrelationPairing};
use crate::types::{ColumnProfile, CorrelationMatrix};

/// Pearson coefficient of two equally long samples, 0 when either has no
/// variance.
pub(crate) fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n == 0 {
        return 0.0;
    }
    let mean_x = xs[..n].iter().sum::<f64>() / n as f64;
    let mean_y = ys[..n].iter().sum::<f64>() / n as f64;

    let mut numerator = 0.0;
    let mut ss_x = 0.0;
    let mut ss_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        numerator += dx * dy;
        ss_x += dx * dx;
        ss_y += dy * dy;
    }

    let denominator = ss_x * ss_y;
    if denominator == 0.0 {
        return 0.0;
    }
    (numerator / denominator.sqrt()).clamp(-1.0, 1.0)
}

/// Coefficient for one column pair, `None` when the pair cannot be compared.
fn pair_coefficient(
    a: &ColumnProfile,
    b: &ColumnProfile,
    pairing: CorrelationPairing,
) -> Option<f64> {
    match pairing {
        CorrelationPairing::Positional => {
            let xs = &a.numeric()?.values;
            let ys = &b.numeric()?.values;
            (xs.len() == ys.len() && xs.len() > 1).then(|| pearson(xs, ys))
        }
        CorrelationPairing::RowAligned => {
            let (xs, ys): (Vec<f64>, Vec<f64>) = a
                .raw_values
                .iter()
                .zip(&b.raw_values)
                .filter_map(|(x, y)| Some((x.as_f64()?, y.as_f64()?)))
                .unzip();
            (xs.len() > 1).then(|| pearson(&xs, &ys))
        }
    }
}

/// Build the symmetric correlation matrix over `columns`.
///
/// Columns with at least two values get a diagonal entry of 1.0. Pairs that
/// cannot be compared under the configured pairing get no entry.
pub(crate) fn correlation_matrix(
    columns: &[&ColumnProfile],
    config: &AnalysisConfig,
) -> CorrelationMatrix {
    let mut matrix = CorrelationMatrix::new();
    for column in columns {
        matrix.add_column(&column.name);
        if column.numeric().is_some_and(|stats| stats.values.len() > 1) {
            matrix.insert(&column.name, &column.name, 1.0);
        }
    }

    let pairs: Vec<(usize, usize)> = (0..columns.len())
        .flat_map(|i| (i + 1..columns.len()).map(move |j| (i, j)))
        .collect();

    let compute = |&(i, j): &(usize, usize)| {
        pair_coefficient(columns[i], columns[j], config.correlation_pairing).map(|c| (i, j, c))
    };
    let coefficients: Vec<(usize, usize, f64)> = if config.parallel {
        pairs.par_iter().filter_map(compute).collect()
    } else {
        pairs.iter().filter_map(compute).collect()
    };

    debug!(
        "Correlated {} of {} column pairs ({:?} pairing)",
        coefficients.len(),
        pairs.len(),
        config.correlation_pairing
    );
    if coefficients.len() < pairs.len() {
        warn!(
            "Skipped {} column pairs that could not be aligned",
            pairs.len() - coefficients.len()
        );
    }

    for (i, j, c) in coefficients {
        matrix.insert(&columns[i].name, &columns[j].name, c);
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profiler::statistics::numeric_stats;
    use crate::types::{ColumnStats, ColumnType, Value};

    fn numeric_column(name: &str, raw: Vec<Value>) -> ColumnProfile {
        let values: Vec<f64> = raw.iter().filter_map(Value::as_f64).collect();
        let stats = numeric_stats(values, &AnalysisConfig::default()).unwrap();
        ColumnProfile {
            name: name.to_string(),
            inferred_type: ColumnType::Numeric,
            non_null_values: raw.iter().filter(|v| !v.is_missing()).cloned().collect(),
            missing_count: raw.iter().filter(|v| v.is_missing()).count(),
            unique_count: 0,
            raw_values: raw,
            stats: ColumnStats::Numeric(stats),
        }
    }

    fn nums(values: &[f64]) -> Vec<Value> {
        values.iter().map(|v| Value::from(*v)).collect()
    }

    #[test]
    fn test_pearson_perfect() {
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
        assert_eq!(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0);
    }

    #[test]
    fn test_pearson_zero_variance() {
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), 0.0);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let a = numeric_column("a", nums(&[1.0, 2.0, 3.0, 4.0]));
        let b = numeric_column("b", nums(&[2.0, 1.0, 4.0, 3.0]));
        let m = correlation_matrix(&[&a, &b], &AnalysisConfig::default());
        assert_eq!(m.get("a", "a"), Some(1.0));
        assert_eq!(m.get("b", "b"), Some(1.0));
        assert_eq!(m.get("a", "b"), m.get("b", "a"));
        assert!((m.get("a", "b").unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_positional_skips_unequal_lengths() {
        let a = numeric_column("a", nums(&[1.0, 2.0, 3.0]));
        let mut raw = nums(&[1.0, 2.0]);
        raw.push(Value::Null);
        let b = numeric_column("b", raw);
        let m = correlation_matrix(&[&a, &b], &AnalysisConfig::default());
        assert_eq!(m.get("a", "b"), None);
        assert!(m.pairs().is_empty());
        assert_eq!(m.columns().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_positional_pairs_after_independent_filtering() {
        // nulls at different rows: positional pairing lines up 1-2-3 with 10-20-30
        let a = numeric_column("a", vec![Value::Null, 1.0.into(), 2.0.into(), 3.0.into()]);
        let b = numeric_column("b", vec![10.0.into(), 20.0.into(), 30.0.into(), Value::Null]);
        let m = correlation_matrix(&[&a, &b], &AnalysisConfig::default());
        assert_eq!(m.get("a", "b"), Some(1.0));
    }

    #[test]
    fn test_row_aligned_pairs_by_row() {
        let a = numeric_column(
            "a",
            vec![Value::Null, 1.0.into(), 2.0.into(), 3.0.into(), 4.0.into()],
        );
        let b = numeric_column(
            "b",
            vec![10.0.into(), 4.0.into(), 3.0.into(), 2.0.into(), Value::Null],
        );
        let config = AnalysisConfig {
            correlation_pairing: CorrelationPairing::RowAligned,
            ..AnalysisConfig::default()
        };
        let m = correlation_matrix(&[&a, &b], &config);
        assert_eq!(m.get("a", "b"), Some(-1.0));
    }

    #[test]
    fn test_row_aligned_needs_two_rows() {
        let a = numeric_column("a", vec![1.0.into(), Value::Null, 3.0.into()]);
        let b = numeric_column("b", vec![Value::Null, 2.0.into(), 5.0.into()]);
        let config = AnalysisConfig {
            correlation_pairing: CorrelationPairing::RowAligned,
            ..AnalysisConfig::default()
        };
        assert_eq!(correlation_matrix(&[&a, &b], &config).get("a", "b"), None);
    }

    #[test]
    fn test_single_value_column_has_no_diagonal() {
        let a = numeric_column("a", nums(&[7.0]));
        let m = correlation_matrix(&[&a], &AnalysisConfig::default());
        assert_eq!(m.get("a", "a"), None);
        assert_eq!(m.columns().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let cols: Vec<ColumnProfile> = (0..6)
            .map(|k| {
                let raw = nums(&(0..12).map(|i| ((i * (k + 3)) % 11) as f64).collect::<Vec<_>>());
                numeric_column(&format!("c{k}"), raw)
            })
            .collect();
        let refs: Vec<&ColumnProfile> = cols.iter().collect();
        let parallel = correlation_matrix(&refs, &AnalysisConfig::default());
        let sequential = correlation_matrix(
            &refs,
            &AnalysisConfig {
                parallel: false,
                ..AnalysisConfig::default()
            },
        );
        assert_eq!(parallel, sequential);
        assert_eq!(parallel.pairs().len(), 15);
    }
}
