//! Narrative report rendering.
//!
//! The report is composed from independently rendered sections joined in a
//! fixed order:
//!
//! 1. Data quality summary
//! 2. Duplicate row examples (only when duplicates exist)
//! 3. Column-by-column insights, in dataset column order
//! 4. Correlation insights
//! 5. Distribution insights, followed by a fallback sentence when no
//!    insight fired
//! 6. Actionable recommendations

use crate::config::AnalysisConfig;
use crate::profiler::ranked;
use crate::types::{
    CategoricalStats, ColumnProfile, ColumnStats, DatasetProfile, DateRange, InsightRecord,
    NumericStats, RecommendationRecord,
};
use crate::utils::{Precision, format_magnitude, format_percent, format_row, safe_ratio};

/// Returned instead of a report when there is nothing to analyze.
pub const EMPTY_DATASET_MESSAGE: &str =
    "✅ **Analysis Complete**: No data was provided to analyze.";

const NO_INSIGHTS_MESSAGE: &str = "No further insights were identified based on the data provided.";

const NO_RECOMMENDATIONS_MESSAGE: &str = "No actionable recommendations were identified for this \
     dataset. The data appears to be well-structured.";

/// Renders a profile and its rule records into markdown-flavoured text.
pub struct ReportGenerator<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> ReportGenerator<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Render the full report.
    pub fn render(
        &self,
        profile: &DatasetProfile,
        insights: &[InsightRecord],
        recommendations: &[RecommendationRecord],
    ) -> String {
        if profile.row_count == 0 {
            return EMPTY_DATASET_MESSAGE.to_string();
        }

        let sections = [
            Self::quality_summary(profile),
            self.duplicate_examples(profile),
            self.column_insights(profile),
            Self::correlation_section(profile, insights),
            Self::distribution_section(profile, insights),
            Self::no_insights_fallback(insights),
            Self::recommendations_section(recommendations),
        ];
        sections.concat()
    }

    fn quality_summary(profile: &DatasetProfile) -> String {
        format!(
            "### 📊 Data Quality Summary\n\n\
             The dataset contains **{rows}** rows and **{cols}** columns.\n\n\
             Your data has an **Overall Quality Score** of **{score} / 100**.\n\n\
             A total of **{empty}** ({empty_pct}%) empty cells and **{dups}** ({dup_pct}%) \
             duplicate rows were found.\n",
            rows = profile.row_count,
            cols = profile.column_count,
            score = format_percent(profile.quality_score, Precision::Detail),
            empty = profile.empty_cell_count,
            empty_pct = format_percent(profile.empty_ratio(), Precision::Detail),
            dups = profile.duplicate_rows.len(),
            dup_pct = format_percent(profile.duplicate_ratio(), Precision::Detail),
        )
    }

    fn duplicate_examples(&self, profile: &DatasetProfile) -> String {
        if profile.duplicate_rows.is_empty() {
            return String::new();
        }
        let examples: String = profile
            .duplicate_rows
            .iter()
            .take(self.config.duplicate_examples)
            .enumerate()
            .map(|(i, row)| format!("  - Row {}: `{}`\n", i + 1, format_row(row)))
            .collect();
        format!(
            "\n---\n### 📋 Examples of Duplicate Rows\n\n\
             Below are some examples of the duplicate rows detected in your dataset:\n\n\
             {examples}"
        )
    }

    fn column_insights(&self, profile: &DatasetProfile) -> String {
        let columns: String = profile
            .column_profiles
            .iter()
            .map(|column| self.column_block(column))
            .collect();
        format!("\n---\n\n### 🔍 Column-by-Column Insights\n{columns}")
    }

    fn column_block(&self, column: &ColumnProfile) -> String {
        let header = format!(
            "\n**`{name}`**\n\
             - **Type**: {kind}\n\
             - **Missing Values**: {missing} ({missing_pct}%)\n\
             - **Unique Values**: {unique} (Cardinality: {unique_pct}%)\n",
            name = column.name,
            kind = column.inferred_type,
            missing = column.missing_count,
            missing_pct = format_percent(column.missing_ratio(), Precision::Detail),
            unique = column.unique_count,
            unique_pct = format_percent(column.unique_ratio(), Precision::Detail),
        );
        let detail = match &column.stats {
            ColumnStats::Numeric(stats) => Self::numeric_detail(column, stats),
            ColumnStats::Date(range) => Self::date_detail(range),
            ColumnStats::Categorical(stats) => self.categorical_detail(stats),
            ColumnStats::Empty => String::new(),
        };
        header + &detail
    }

    fn numeric_detail(column: &ColumnProfile, stats: &NumericStats) -> String {
        let s = &stats.summary;
        format!(
            "- **Summary**: {summary}\n\
             - **Range**: **{min} - {max}**\n\
             - **Median**: **{median}**\n\
             - **Standard Deviation**: **{stdev}**\n\
             - **Outliers**: {outliers} detected.\n",
            summary = Self::numeric_summary_sentence(column, stats),
            min = format_magnitude(s.min),
            max = format_magnitude(s.max),
            median = format_magnitude(s.median),
            stdev = format_magnitude(s.stdev),
            outliers = stats.outliers.len(),
        )
    }

    /// One-line description of a numeric column.
    fn numeric_summary_sentence(column: &ColumnProfile, stats: &NumericStats) -> String {
        let s = &stats.summary;
        let mut parts = vec![
            format!(
                "The '{}' data ranges from **{}** to **{}**.",
                column.name,
                format_magnitude(s.min),
                format_magnitude(s.max)
            ),
            format!("The median value is **{}**.", format_magnitude(s.median)),
        ];

        // non-numeric entries count as missing here
        let rows = column.raw_values.len();
        let missing = rows.saturating_sub(stats.values.len());
        if missing > 0 {
            parts.push(format!(
                "About **{}% of the values are missing**.",
                format_percent(safe_ratio(missing, rows), Precision::Whole)
            ));
        }
        if !stats.outliers.is_empty() {
            parts.push(format!(
                "**{} potential outliers** were detected.",
                stats.outliers.len()
            ));
        }
        parts.join(" ")
    }

    fn date_detail(range: &DateRange) -> String {
        format!(
            "- **Date Range**: **{}** to **{}**.\n",
            range.start_label(),
            range.end_label()
        )
    }

    fn categorical_detail(&self, stats: &CategoricalStats) -> String {
        if stats.frequencies.is_empty() {
            return String::new();
        }
        let total = stats.total();
        let top: String = ranked(&stats.frequencies)
            .into_iter()
            .take(self.config.report_top_categories)
            .map(|(label, count)| {
                format!(
                    "  - **{label}** ({}%)\n",
                    format_percent(safe_ratio(count, total), Precision::Short)
                )
            })
            .collect();
        format!("- **Top Categories**:\n{top}")
    }

    fn correlation_section(profile: &DatasetProfile, insights: &[InsightRecord]) -> String {
        let mut section =
            String::from("\n---\n\n### 📈 Correlation Analysis & Dynamic Insights\n\n");
        if profile.numeric_columns().next().is_some() {
            section.push_str(
                "To better understand the relationships between your variables, a correlation \
                 heatmap is a powerful tool. \n\n\
                 Here's a look at some of the most notable relationships:\n",
            );
            section.push_str(&bullets(
                insights
                    .iter()
                    .filter(|i| i.kind.is_correlation())
                    .map(|i| &i.text),
            ));
        }
        section
    }

    fn distribution_section(profile: &DatasetProfile, insights: &[InsightRecord]) -> String {
        if profile.categorical_like_columns().next().is_none() {
            return String::new();
        }
        format!(
            "\n---\n\n### 📊 Distribution Insights\n\n\
             These insights highlight key characteristics about the distribution of your data.\n\n\
             {}",
            bullets(
                insights
                    .iter()
                    .filter(|i| !i.kind.is_correlation())
                    .map(|i| &i.text)
            )
        )
    }

    fn no_insights_fallback(insights: &[InsightRecord]) -> String {
        if insights.is_empty() {
            format!("{NO_INSIGHTS_MESSAGE}\n")
        } else {
            String::new()
        }
    }

    fn recommendations_section(recommendations: &[RecommendationRecord]) -> String {
        let body = if recommendations.is_empty() {
            format!("{NO_RECOMMENDATIONS_MESSAGE}\n")
        } else {
            bullets(recommendations.iter().map(|r| &r.text))
        };
        format!("\n---\n\n### 🚀 Actionable Recommendations\n\n{body}")
    }
}

fn bullets<'a>(lines: impl Iterator<Item = &'a String>) -> String {
    lines.map(|line| format!("- {line}\n")).collect()
}
