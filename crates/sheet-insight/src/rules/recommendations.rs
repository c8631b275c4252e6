use super::RuleEngine;
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::types::{ColumnProfile, DatasetProfile, RecommendationKind, RecommendationRecord};
use crate::utils::{Precision, format_magnitude, format_percent};

/// Actionable suggestions tied to data-quality conditions.
///
/// Order: deduplication, then for each column its missing-data, outlier and
/// redundancy rules, then every constant column.
pub struct RecommendationEngine<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> RecommendationEngine<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }
}

impl RuleEngine for RecommendationEngine<'_> {
    type Record = RecommendationRecord;

    fn evaluate(&self, profile: &DatasetProfile) -> Result<Vec<RecommendationRecord>> {
        let mut records: Vec<RecommendationRecord> = deduplication(profile).into_iter().collect();

        for column in &profile.column_profiles {
            records.extend(missing_data(column, self.config));
            records.extend(outliers(column));
            records.extend(redundancy(column, profile, self.config));
        }
        records.extend(profile.column_profiles.iter().filter_map(constant_column));

        Ok(records)
    }
}

fn record(kind: RecommendationKind, columns: Vec<String>, text: String) -> RecommendationRecord {
    RecommendationRecord {
        kind,
        columns,
        text,
    }
}

fn deduplication(profile: &DatasetProfile) -> Option<RecommendationRecord> {
    let count = profile.duplicate_rows.len();
    (count > 0).then(|| {
        record(
            RecommendationKind::RemoveDuplicates,
            Vec::new(),
            format!(
                "**Clean Data**: Your dataset contains **{count}** duplicate rows. It's \
                 recommended to remove these to avoid biased analysis."
            ),
        )
    })
}

fn missing_data(column: &ColumnProfile, config: &AnalysisConfig) -> Option<RecommendationRecord> {
    let ratio = column.missing_ratio();
    let name = &column.name;
    if ratio > config.drop_missing_threshold {
        Some(record(
            RecommendationKind::DropColumn,
            vec![name.clone()],
            format!(
                "**Consider Dropping**: The column `**{name}**` has **{}%** missing values. \
                 It's likely not useful for analysis and could be dropped to simplify your \
                 dataset.",
                format_percent(ratio, Precision::Short)
            ),
        ))
    } else if ratio > 0.0 {
        Some(record(
            RecommendationKind::ImputeMissing,
            vec![name.clone()],
            format!(
                "**Impute Missing Data**: The column `**{name}**` has missing values. You could \
                 consider imputing these values using techniques like mean, median, or a more \
                 advanced method."
            ),
        ))
    } else {
        None
    }
}

fn outliers(column: &ColumnProfile) -> Option<RecommendationRecord> {
    let count = column.numeric()?.outliers.len();
    let name = &column.name;
    (count > 0).then(|| {
        record(
            RecommendationKind::InvestigateOutliers,
            vec![name.clone()],
            format!(
                "**Investigate Outliers**: The column `**{name}**` has **{count}** potential \
                 outliers. This may indicate data entry errors or unusual events that need to \
                 be investigated."
            ),
        )
    })
}

/// One record per partner column correlated above the suspicious threshold.
fn redundancy(
    column: &ColumnProfile,
    profile: &DatasetProfile,
    config: &AnalysisConfig,
) -> Vec<RecommendationRecord> {
    let name = &column.name;
    profile
        .correlation
        .partners(name)
        .filter(|(_, c)| c.abs() > config.suspicious_correlation_threshold)
        .map(|(other, c)| {
            record(
                RecommendationKind::CheckRedundancy,
                vec![name.clone(), other.to_string()],
                format!(
                    "**Check Redundancy**: The column `**{name}**` is highly correlated (**{}**) \
                     with `**{other}**`. Consider if one of these columns is redundant.",
                    format_magnitude(c)
                ),
            )
        })
        .collect()
}

fn constant_column(column: &ColumnProfile) -> Option<RecommendationRecord> {
    let name = &column.name;
    (column.unique_count == 1).then(|| {
        record(
            RecommendationKind::DropConstant,
            vec![name.clone()],
            format!(
                "**Drop Constant Column**: The column `**{name}**` has only one unique value. It \
                 provides no predictive power and can be dropped."
            ),
        )
    })
}
