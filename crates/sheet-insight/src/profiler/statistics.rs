//! Descriptive statistics for numeric columns.

use crate::config::{AnalysisConfig, QuartileMethod};
use crate::types::{Bin, NumericStats, NumericSummary};
use crate::utils::format_magnitude;

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Arithmetic mean, 0 for no values.
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Middle element (odd count) or mean of the two middle elements (even count).
pub(crate) fn median(values: &[f64]) -> f64 {
    let sorted = sorted(values);
    let n = sorted.len();
    if n == 0 {
        return 0.0;
    }
    let mid = n / 2;
    if n % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Population standard deviation (divides by n). Fewer than two values give 0.
pub(crate) fn population_std(values: &[f64], mean: f64) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / values.len() as f64).sqrt()
}

/// First and third quartile of an ascending slice with at least four values.
fn quartiles(sorted: &[f64], method: QuartileMethod) -> (f64, f64) {
    let n = sorted.len();
    match method {
        QuartileMethod::Legacy => {
            let mid = n / 2;
            let half = mid / 2;
            if n % 2 == 1 {
                (sorted[half], sorted[mid + half])
            } else {
                // for n == 4 the upper index lands one past the end
                let upper = (mid + half + 1).min(n - 1);
                (
                    (sorted[half - 1] + sorted[half]) / 2.0,
                    (sorted[mid + half] + sorted[upper]) / 2.0,
                )
            }
        }
        QuartileMethod::Linear => (
            interpolate(sorted, 0.25),
            interpolate(sorted, 0.75),
        ),
    }
}

fn interpolate(sorted: &[f64], p: f64) -> f64 {
    let pos = (sorted.len() - 1) as f64 * p;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

/// Values strictly outside `[q1 - k*IQR, q3 + k*IQR]`, ascending.
pub(crate) fn detect_outliers(values: &[f64], config: &AnalysisConfig) -> Vec<f64> {
    if values.len() < config.outlier_min_values.max(4) {
        return Vec::new();
    }
    let sorted = sorted(values);
    let (q1, q3) = quartiles(&sorted, config.quartile_method);
    let iqr = q3 - q1;
    let lower = q1 - config.outlier_iqr_multiplier * iqr;
    let upper = q3 + config.outlier_iqr_multiplier * iqr;

    sorted
        .into_iter()
        .filter(|v| *v < lower || *v > upper)
        .collect()
}

/// Equal-width histogram over `[min, max]`.
///
/// A column without spread yields one bin labelled by its value.
pub(crate) fn histogram(values: &[f64], bin_count: usize) -> Vec<Bin> {
    if values.is_empty() || bin_count == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bin_count as f64;

    if width == 0.0 || !width.is_finite() {
        return vec![Bin {
            label: format_magnitude(min),
            count: values.len(),
        }];
    }

    let mut bins: Vec<Bin> = (0..bin_count)
        .map(|i| Bin {
            label: format!(
                "{}-{}",
                format_magnitude(min + i as f64 * width),
                format_magnitude(min + (i + 1) as f64 * width)
            ),
            count: 0,
        })
        .collect();

    for v in values {
        let index = (((v - min) / width).floor() as usize).min(bin_count - 1);
        bins[index].count += 1;
    }
    bins
}

/// Chart summary of a numeric column, `None` when it has no values.
pub(crate) fn numeric_summary(values: &[f64], config: &AnalysisConfig) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let sorted = sorted(values);
    let avg = mean(&sorted);
    Some(NumericSummary {
        min: sorted[0],
        max: sorted[sorted.len() - 1],
        avg,
        median: median(&sorted),
        stdev: population_std(&sorted, avg),
        histogram_bins: histogram(&sorted, config.histogram_bins),
    })
}

/// Full statistics of a numeric column, keeping `values` in row order.
pub(crate) fn numeric_stats(values: Vec<f64>, config: &AnalysisConfig) -> Option<NumericStats> {
    let summary = numeric_summary(&values, config)?;
    let outliers = detect_outliers(&values, config);
    Some(NumericStats {
        values,
        summary,
        outliers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn config() -> AnalysisConfig {
        AnalysisConfig::default()
    }

    // ==================== median tests ====================

    #[test]
    fn test_median_odd() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
    }

    #[test]
    fn test_median_even() {
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
    }

    #[test]
    fn test_median_empty() {
        assert_eq!(median(&[]), 0.0);
    }

    // ==================== population_std tests ====================

    #[test]
    fn test_population_std_divides_by_n() {
        // mean 5, squared deviations sum to 32 over 8 values
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(population_std(&values, mean(&values)), 2.0);
    }

    #[test]
    fn test_population_std_single_value() {
        assert_eq!(population_std(&[5.0], 5.0), 0.0);
    }

    #[test]
    fn test_population_std_constant() {
        assert_eq!(population_std(&[3.0, 3.0, 3.0], 3.0), 0.0);
    }

    // ==================== detect_outliers tests ====================

    #[test]
    fn test_outliers_legacy_scheme() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 100.0];
        assert_eq!(detect_outliers(&values, &config()), vec![100.0]);
    }

    #[test]
    fn test_outliers_too_few_values() {
        assert!(detect_outliers(&[1.0, 2.0, 1000.0], &config()).is_empty());
    }

    #[test]
    fn test_outliers_four_values_does_not_overrun() {
        // q1 = 20, q3 clamps to the last element
        let values = [20.0, 21.0, 20.0, 999.0];
        assert!(detect_outliers(&values, &config()).is_empty());
    }

    #[test]
    fn test_outliers_even_count() {
        // n = 8: q1 = (v1 + v2) / 2 = 2.5, q3 = (v6 + v7) / 2
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 50.0];
        let (q1, q3) = quartiles(&values, QuartileMethod::Legacy);
        assert_eq!(q1, 2.5);
        assert_eq!(q3, 28.5);
        assert!(detect_outliers(&values, &config()).is_empty());
    }

    #[test]
    fn test_outliers_both_sides() {
        let values = [-500.0, 10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 500.0];
        assert_eq!(detect_outliers(&values, &config()), vec![-500.0, 500.0]);
    }

    #[test]
    fn test_outliers_linear_quartiles() {
        let cfg = AnalysisConfig {
            quartile_method: QuartileMethod::Linear,
            ..AnalysisConfig::default()
        };
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 100.0];
        assert_eq!(quartiles(&values, QuartileMethod::Linear), (2.5, 5.5));
        assert_eq!(detect_outliers(&values, &cfg), vec![100.0]);
    }

    // ==================== histogram tests ====================

    #[test]
    fn test_histogram_ten_bins() {
        let values: Vec<f64> = (0..=100).map(f64::from).collect();
        let bins = histogram(&values, 10);
        assert_eq!(bins.len(), 10);
        assert_eq!(bins[0].label, "0.00-10.00");
        assert_eq!(bins[9].label, "90.00-100.00");
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), values.len());
        // max value falls into the last bin
        assert_eq!(bins[9].count, 11);
    }

    #[test]
    fn test_histogram_constant_column() {
        let bins = histogram(&[7.0, 7.0, 7.0], 10);
        assert_eq!(
            bins,
            vec![Bin {
                label: "7.00".to_string(),
                count: 3
            }]
        );
    }

    #[test]
    fn test_histogram_single_value() {
        assert_eq!(histogram(&[4.2], 10).len(), 1);
    }

    #[test]
    fn test_histogram_empty() {
        assert!(histogram(&[], 10).is_empty());
    }

    // ==================== numeric_summary tests ====================

    #[test]
    fn test_numeric_summary_ordering_invariant() {
        let summary = numeric_summary(&[20.0, 21.0, 20.0, 999.0], &config()).unwrap();
        assert_eq!(summary.min, 20.0);
        assert_eq!(summary.max, 999.0);
        assert_eq!(summary.median, 20.5);
        assert_eq!(summary.avg, 265.0);
        assert!(summary.min <= summary.median && summary.median <= summary.max);
        assert!(summary.stdev >= 0.0);
    }

    #[test]
    fn test_numeric_stats_keeps_row_order() {
        let stats = numeric_stats(vec![3.0, 1.0, 2.0], &config()).unwrap();
        assert_eq!(stats.values, vec![3.0, 1.0, 2.0]);
        assert!(stats.outliers.is_empty());
    }

    #[test]
    fn test_numeric_summary_empty() {
        assert!(numeric_summary(&[], &config()).is_none());
    }
}
