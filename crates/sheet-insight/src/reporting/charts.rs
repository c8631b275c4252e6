use tracing::debug;

use crate::types::{ChartData, ColumnStats, ColumnType, DatasetProfile};

/// Collects the chart-ready views of a profile.
pub struct ChartDataAggregator;

impl ChartDataAggregator {
    /// Numeric summaries for Numeric columns, top-N frequencies (with an
    /// "Other" bucket) for Categorical columns, and the correlation matrix.
    ///
    /// ID/Text columns are left out of the frequency charts.
    pub fn aggregate(profile: &DatasetProfile) -> ChartData {
        let mut chart = ChartData {
            correlation_matrix: profile.correlation.clone(),
            ..ChartData::default()
        };

        for column in &profile.column_profiles {
            match (&column.inferred_type, &column.stats) {
                (ColumnType::Numeric, ColumnStats::Numeric(stats)) => {
                    chart
                        .numeric_data
                        .insert(column.name.clone(), stats.summary.clone());
                }
                (ColumnType::Categorical, ColumnStats::Categorical(stats)) => {
                    chart
                        .categorical_frequencies
                        .insert(column.name.clone(), stats.top_with_other.clone());
                }
                _ => {}
            }
        }

        debug!(
            "Chart data: {} numeric, {} categorical, {} correlated columns",
            chart.numeric_data.len(),
            chart.categorical_frequencies.len(),
            chart.correlation_matrix.columns().count()
        );
        chart
    }
}
