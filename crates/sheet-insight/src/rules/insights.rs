use regex::Regex;

use super::RuleEngine;
use crate::config::{AnalysisConfig, GroupedInsightRule};
use crate::error::Result;
use crate::types::{ColumnProfile, DatasetProfile, InsightKind, InsightRecord};
use crate::utils::format_magnitude;

/// Observational insights: notable correlations, imbalanced categories and
/// configured grouped insights.
pub struct InsightEngine<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> InsightEngine<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }
}

impl RuleEngine for InsightEngine<'_> {
    type Record = InsightRecord;

    fn evaluate(&self, profile: &DatasetProfile) -> Result<Vec<InsightRecord>> {
        let grouped = compile_grouped_rules(&self.config.grouped_insights)?;

        let mut records = correlation_insights(profile, self.config);
        for column in profile.categorical_like_columns() {
            records.extend(imbalance_insight(column));
            records.extend(
                grouped
                    .iter()
                    .filter_map(|rule| grouped_insight(rule, column, profile)),
            );
        }
        Ok(records)
    }
}

/// Off-diagonal correlations above the strong or suspicious threshold, one
/// record per unordered pair.
fn correlation_insights(profile: &DatasetProfile, config: &AnalysisConfig) -> Vec<InsightRecord> {
    profile
        .correlation
        .pairs()
        .into_iter()
        .filter_map(|(a, b, coefficient)| {
            let strength = coefficient.abs();
            let (kind, text) = if strength > config.suspicious_correlation_threshold {
                (
                    InsightKind::SuspiciousCorrelation,
                    format!(
                        "**⚠️ Suspiciously High Correlation**: A strong correlation of **{}** \
                         between `**{a}**` and `**{b}**` was detected. This may indicate a data \
                         leak or a derived column.",
                        format_magnitude(coefficient)
                    ),
                )
            } else if strength > config.strong_correlation_threshold {
                (
                    InsightKind::StrongCorrelation,
                    format!(
                        "**Strong Correlation**: There is a strong relationship between `**{a}**` \
                         and `**{b}**`, with a correlation of **{}**.",
                        format_magnitude(coefficient)
                    ),
                )
            } else {
                return None;
            };
            Some(InsightRecord {
                kind,
                columns: vec![a.to_string(), b.to_string()],
                text,
            })
        })
        .collect()
}

fn imbalance_insight(column: &ColumnProfile) -> Option<InsightRecord> {
    let stats = column.categorical()?;
    stats.imbalanced.then(|| InsightRecord {
        kind: InsightKind::Imbalance,
        columns: vec![column.name.clone()],
        text: format!(
            "**⚠️ Imbalance Detected**: The column `**{}**` is highly imbalanced, with a few \
             categories dominating the data. This could affect model performance.",
            column.name
        ),
    })
}

struct CompiledGroupedRule<'a> {
    rule: &'a GroupedInsightRule,
    numeric: Regex,
    categorical: Regex,
}

fn compile_grouped_rules(rules: &[GroupedInsightRule]) -> Result<Vec<CompiledGroupedRule<'_>>> {
    rules
        .iter()
        .map(|rule| {
            let (numeric, categorical) = rule.compile()?;
            Ok(CompiledGroupedRule {
                rule,
                numeric,
                categorical,
            })
        })
        .collect()
}

/// Fires when `column` matches the categorical pattern and some numeric
/// column matches the numeric pattern.
fn grouped_insight(
    compiled: &CompiledGroupedRule<'_>,
    column: &ColumnProfile,
    profile: &DatasetProfile,
) -> Option<InsightRecord> {
    if !compiled.categorical.is_match(&column.name) {
        return None;
    }
    let numeric = profile
        .numeric_columns()
        .find(|p| compiled.numeric.is_match(&p.name))?;
    Some(InsightRecord {
        kind: InsightKind::Grouped,
        columns: vec![numeric.name.clone(), column.name.clone()],
        text: format!(
            "**Grouped Insight**: {}",
            compiled.rule.render(&numeric.name, &column.name)
        ),
    })
}
