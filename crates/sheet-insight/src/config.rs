//! Configuration types for dataset analysis.
//!
//! Every threshold used by type inference, outlier detection, insight and
//! recommendation rules lives here so it can be tuned (and injected in
//! tests) without touching the rule code. Use [`AnalysisConfig::builder()`]
//! for a validated configuration.

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Quartile scheme used by outlier detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QuartileMethod {
    /// Historical index scheme based on `mid = n / 2`.
    #[default]
    Legacy,
    /// Linear interpolation at positions `(n - 1) * 0.25` and `(n - 1) * 0.75`.
    Linear,
}

/// How two numeric columns are paired up before computing Pearson correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum CorrelationPairing {
    /// Null-filter each column independently and pair by position; pairs
    /// whose filtered lengths differ are skipped.
    #[default]
    Positional,
    /// Pair values by row index and drop rows where either side is missing.
    RowAligned,
}

/// What to do with rows whose keys differ from the first row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SchemaPolicy {
    /// Reject the dataset with a schema error.
    #[default]
    Strict,
    /// Fill missing keys with null and ignore extra keys.
    NullFill,
}

/// A declarative "grouped insight": fires when some numeric column matches
/// `numeric_column` and some profiled categorical column matches
/// `categorical_column`.
///
/// `template` may reference `{numeric}` and `{categorical}`, which are
/// replaced by the matching column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupedInsightRule {
    /// Regex matched against numeric column names.
    pub numeric_column: String,
    /// Regex matched against non-numeric, non-date column names.
    pub categorical_column: String,
    /// Sentence emitted when the rule fires.
    pub template: String,
}

impl GroupedInsightRule {
    pub fn new(
        numeric_column: impl Into<String>,
        categorical_column: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            numeric_column: numeric_column.into(),
            categorical_column: categorical_column.into(),
            template: template.into(),
        }
    }

    /// Compile both patterns.
    pub fn compile(&self) -> Result<(Regex, Regex), ConfigValidationError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ConfigValidationError::InvalidPattern {
                pattern: pattern.to_string(),
                reason: e.to_string(),
            })
        };
        Ok((
            compile(&self.numeric_column)?,
            compile(&self.categorical_column)?,
        ))
    }

    /// Fill the template placeholders.
    pub fn render(&self, numeric: &str, categorical: &str) -> String {
        self.template
            .replace("{numeric}", numeric)
            .replace("{categorical}", categorical)
    }
}

impl Default for GroupedInsightRule {
    fn default() -> Self {
        Self::new(
            "^Salary$",
            "(?i)department",
            "The average salary for employees in different departments shows significant \
             variation. Consider visualizing this to identify key trends.",
        )
    }
}

/// Configuration for an analysis run.
///
/// # Example
///
/// ```rust,ignore
/// use sheet_insight::config::{AnalysisConfig, CorrelationPairing};
///
/// let config = AnalysisConfig::builder()
///     .imbalance_threshold(0.8)
///     .correlation_pairing(CorrelationPairing::RowAligned)
///     .build()?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Share of non-missing values that must be numbers for a column to be
    /// numeric (strict inequality). Default: 0.8
    pub numeric_ratio_threshold: f64,

    /// Share of numeric values that must look like date serials for a
    /// numeric column to be reported as a date (strict). Default: 0.8
    pub date_ratio_threshold: f64,

    /// Default: Legacy
    pub quartile_method: QuartileMethod,

    /// Multiplier applied to the IQR to get the outlier fences. Default: 1.5
    pub outlier_iqr_multiplier: f64,

    /// Fewer values than this never produce outliers. Default: 4
    pub outlier_min_values: usize,

    /// Number of equal-width histogram bins. Default: 10
    pub histogram_bins: usize,

    /// Categories kept in chart frequency tables before the "Other" bucket.
    /// Default: 20
    pub chart_top_categories: usize,

    /// Categories listed per column in the narrative. Default: 5
    pub report_top_categories: usize,

    /// Duplicate rows quoted in the narrative. Default: 5
    pub duplicate_examples: usize,

    /// Dominant-category share above which a column is imbalanced.
    /// Default: 0.9
    pub imbalance_threshold: f64,

    /// |r| above which a correlation is suspicious. Default: 0.95
    pub suspicious_correlation_threshold: f64,

    /// |r| above which a correlation is strong. Default: 0.7
    pub strong_correlation_threshold: f64,

    /// Missing share above which dropping a column is suggested.
    /// Default: 0.9
    pub drop_missing_threshold: f64,

    /// Weight of the empty-cell ratio in the quality score. Default: 0.5
    pub missing_weight: f64,

    /// Weight of the duplicate-row ratio in the quality score. Default: 0.5
    pub duplicate_weight: f64,

    /// Default: Positional
    pub correlation_pairing: CorrelationPairing,

    /// Default: Strict
    pub schema_policy: SchemaPolicy,

    /// Profile columns and correlation pairs on the rayon pool.
    /// Default: true
    pub parallel: bool,

    /// Grouped insight rules, evaluated in order.
    pub grouped_insights: Vec<GroupedInsightRule>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            numeric_ratio_threshold: 0.8,
            date_ratio_threshold: 0.8,
            quartile_method: QuartileMethod::default(),
            outlier_iqr_multiplier: 1.5,
            outlier_min_values: 4,
            histogram_bins: 10,
            chart_top_categories: 20,
            report_top_categories: 5,
            duplicate_examples: 5,
            imbalance_threshold: 0.9,
            suspicious_correlation_threshold: 0.95,
            strong_correlation_threshold: 0.7,
            drop_missing_threshold: 0.9,
            missing_weight: 0.5,
            duplicate_weight: 0.5,
            correlation_pairing: CorrelationPairing::default(),
            schema_policy: SchemaPolicy::default(),
            parallel: true,
            grouped_insights: vec![GroupedInsightRule::default()],
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let ratios = [
            ("numeric_ratio_threshold", self.numeric_ratio_threshold),
            ("date_ratio_threshold", self.date_ratio_threshold),
            ("imbalance_threshold", self.imbalance_threshold),
            (
                "suspicious_correlation_threshold",
                self.suspicious_correlation_threshold,
            ),
            (
                "strong_correlation_threshold",
                self.strong_correlation_threshold,
            ),
            ("drop_missing_threshold", self.drop_missing_threshold),
        ];
        for (field, value) in ratios {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigValidationError::InvalidThreshold {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.strong_correlation_threshold >= self.suspicious_correlation_threshold {
            return Err(ConfigValidationError::InvertedCorrelationThresholds {
                strong: self.strong_correlation_threshold,
                suspicious: self.suspicious_correlation_threshold,
            });
        }

        let weights = [
            ("missing_weight", self.missing_weight),
            ("duplicate_weight", self.duplicate_weight),
            ("outlier_iqr_multiplier", self.outlier_iqr_multiplier),
        ];
        for (field, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigValidationError::InvalidWeight {
                    field: field.to_string(),
                    value,
                });
            }
        }

        let counts = [
            ("histogram_bins", self.histogram_bins, 1),
            ("chart_top_categories", self.chart_top_categories, 1),
            ("report_top_categories", self.report_top_categories, 1),
            ("duplicate_examples", self.duplicate_examples, 1),
            ("outlier_min_values", self.outlier_min_values, 4),
        ];
        for (field, value, min) in counts {
            if value < min {
                return Err(ConfigValidationError::InvalidCount {
                    field: field.to_string(),
                    value,
                });
            }
        }

        for rule in &self.grouped_insights {
            rule.compile()?;
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0.0 and 1.0)")]
    InvalidThreshold { field: String, value: f64 },

    #[error(
        "Strong correlation threshold {strong} must be below the suspicious threshold {suspicious}"
    )]
    InvertedCorrelationThresholds { strong: f64, suspicious: f64 },

    #[error("Invalid value for '{field}': {value} (must be finite and non-negative)")]
    InvalidWeight { field: String, value: f64 },

    #[error("Invalid count for '{field}': {value}")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid column pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    numeric_ratio_threshold: Option<f64>,
    date_ratio_threshold: Option<f64>,
    quartile_method: Option<QuartileMethod>,
    outlier_iqr_multiplier: Option<f64>,
    outlier_min_values: Option<usize>,
    histogram_bins: Option<usize>,
    chart_top_categories: Option<usize>,
    report_top_categories: Option<usize>,
    duplicate_examples: Option<usize>,
    imbalance_threshold: Option<f64>,
    suspicious_correlation_threshold: Option<f64>,
    strong_correlation_threshold: Option<f64>,
    drop_missing_threshold: Option<f64>,
    missing_weight: Option<f64>,
    duplicate_weight: Option<f64>,
    correlation_pairing: Option<CorrelationPairing>,
    schema_policy: Option<SchemaPolicy>,
    parallel: Option<bool>,
    grouped_insights: Option<Vec<GroupedInsightRule>>,
}

impl AnalysisConfigBuilder {
    /// Set the numeric-share threshold used by type inference.
    pub fn numeric_ratio_threshold(mut self, threshold: f64) -> Self {
        self.numeric_ratio_threshold = Some(threshold);
        self
    }

    /// Set the date-serial-share threshold used by type inference.
    pub fn date_ratio_threshold(mut self, threshold: f64) -> Self {
        self.date_ratio_threshold = Some(threshold);
        self
    }

    pub fn quartile_method(mut self, method: QuartileMethod) -> Self {
        self.quartile_method = Some(method);
        self
    }

    pub fn outlier_iqr_multiplier(mut self, multiplier: f64) -> Self {
        self.outlier_iqr_multiplier = Some(multiplier);
        self
    }

    pub fn outlier_min_values(mut self, min: usize) -> Self {
        self.outlier_min_values = Some(min);
        self
    }

    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set how many categories chart tables keep before bucketing the rest.
    pub fn chart_top_categories(mut self, n: usize) -> Self {
        self.chart_top_categories = Some(n);
        self
    }

    pub fn report_top_categories(mut self, n: usize) -> Self {
        self.report_top_categories = Some(n);
        self
    }

    pub fn duplicate_examples(mut self, n: usize) -> Self {
        self.duplicate_examples = Some(n);
        self
    }

    pub fn imbalance_threshold(mut self, threshold: f64) -> Self {
        self.imbalance_threshold = Some(threshold);
        self
    }

    pub fn suspicious_correlation_threshold(mut self, threshold: f64) -> Self {
        self.suspicious_correlation_threshold = Some(threshold);
        self
    }

    pub fn strong_correlation_threshold(mut self, threshold: f64) -> Self {
        self.strong_correlation_threshold = Some(threshold);
        self
    }

    /// Set the missing share above which a column should be dropped.
    pub fn drop_missing_threshold(mut self, threshold: f64) -> Self {
        self.drop_missing_threshold = Some(threshold);
        self
    }

    /// Set the quality score weights for empty cells and duplicate rows.
    pub fn quality_weights(mut self, missing: f64, duplicate: f64) -> Self {
        self.missing_weight = Some(missing);
        self.duplicate_weight = Some(duplicate);
        self
    }

    pub fn correlation_pairing(mut self, pairing: CorrelationPairing) -> Self {
        self.correlation_pairing = Some(pairing);
        self
    }

    pub fn schema_policy(mut self, policy: SchemaPolicy) -> Self {
        self.schema_policy = Some(policy);
        self
    }

    /// Enable or disable the rayon fan-out. Output is identical either way.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = Some(parallel);
        self
    }

    /// Replace the grouped insight rules.
    pub fn grouped_insights(mut self, rules: Vec<GroupedInsightRule>) -> Self {
        self.grouped_insights = Some(rules);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            numeric_ratio_threshold: self
                .numeric_ratio_threshold
                .unwrap_or(defaults.numeric_ratio_threshold),
            date_ratio_threshold: self
                .date_ratio_threshold
                .unwrap_or(defaults.date_ratio_threshold),
            quartile_method: self.quartile_method.unwrap_or_default(),
            outlier_iqr_multiplier: self
                .outlier_iqr_multiplier
                .unwrap_or(defaults.outlier_iqr_multiplier),
            outlier_min_values: self
                .outlier_min_values
                .unwrap_or(defaults.outlier_min_values),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            chart_top_categories: self
                .chart_top_categories
                .unwrap_or(defaults.chart_top_categories),
            report_top_categories: self
                .report_top_categories
                .unwrap_or(defaults.report_top_categories),
            duplicate_examples: self
                .duplicate_examples
                .unwrap_or(defaults.duplicate_examples),
            imbalance_threshold: self
                .imbalance_threshold
                .unwrap_or(defaults.imbalance_threshold),
            suspicious_correlation_threshold: self
                .suspicious_correlation_threshold
                .unwrap_or(defaults.suspicious_correlation_threshold),
            strong_correlation_threshold: self
                .strong_correlation_threshold
                .unwrap_or(defaults.strong_correlation_threshold),
            drop_missing_threshold: self
                .drop_missing_threshold
                .unwrap_or(defaults.drop_missing_threshold),
            missing_weight: self.missing_weight.unwrap_or(defaults.missing_weight),
            duplicate_weight: self.duplicate_weight.unwrap_or(defaults.duplicate_weight),
            correlation_pairing: self.correlation_pairing.unwrap_or_default(),
            schema_policy: self.schema_policy.unwrap_or_default(),
            parallel: self.parallel.unwrap_or(defaults.parallel),
            grouped_insights: self.grouped_insights.unwrap_or(defaults.grouped_insights),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.numeric_ratio_threshold, 0.8);
        assert_eq!(config.date_ratio_threshold, 0.8);
        assert_eq!(config.histogram_bins, 10);
        assert_eq!(config.chart_top_categories, 20);
        assert_eq!(config.quartile_method, QuartileMethod::Legacy);
        assert_eq!(config.correlation_pairing, CorrelationPairing::Positional);
        assert_eq!(config.schema_policy, SchemaPolicy::Strict);
        assert_eq!(config.grouped_insights.len(), 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_defaults_match_default() {
        let config = AnalysisConfig::builder().build().unwrap();
        assert_eq!(config, AnalysisConfig::default());
    }

    #[test]
    fn test_builder_custom_values() {
        let config = AnalysisConfig::builder()
            .imbalance_threshold(0.75)
            .quality_weights(0.7, 0.3)
            .correlation_pairing(CorrelationPairing::RowAligned)
            .schema_policy(SchemaPolicy::NullFill)
            .parallel(false)
            .build()
            .unwrap();

        assert_eq!(config.imbalance_threshold, 0.75);
        assert_eq!(config.missing_weight, 0.7);
        assert_eq!(config.duplicate_weight, 0.3);
        assert_eq!(config.correlation_pairing, CorrelationPairing::RowAligned);
        assert_eq!(config.schema_policy, SchemaPolicy::NullFill);
        assert!(!config.parallel);
    }

    // ==================== validation tests ====================

    #[test]
    fn test_validation_invalid_threshold() {
        let result = AnalysisConfig::builder().imbalance_threshold(1.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidThreshold { .. }
        ));
    }

    #[test]
    fn test_validation_inverted_correlation_thresholds() {
        let result = AnalysisConfig::builder()
            .strong_correlation_threshold(0.96)
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvertedCorrelationThresholds { .. }
        ));
    }

    #[test]
    fn test_validation_zero_bins() {
        let result = AnalysisConfig::builder().histogram_bins(0).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidCount { value: 0, .. }
        ));
    }

    #[test]
    fn test_validation_outlier_min_values_below_four() {
        let result = AnalysisConfig::builder().outlier_min_values(3).build();
        assert!(result.is_err());
    }

    #[test]
    fn test_validation_negative_weight() {
        let result = AnalysisConfig::builder().quality_weights(-0.1, 0.5).build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidWeight { .. }
        ));
    }

    #[test]
    fn test_validation_bad_pattern() {
        let result = AnalysisConfig::builder()
            .grouped_insights(vec![GroupedInsightRule::new("(", "dept", "x")])
            .build();
        assert!(matches!(
            result.unwrap_err(),
            ConfigValidationError::InvalidPattern { .. }
        ));
    }

    // ==================== grouped rule tests ====================

    #[test]
    fn test_grouped_rule_render() {
        let rule = GroupedInsightRule::new("^Revenue$", "(?i)region", "{numeric} by {categorical}");
        assert_eq!(rule.render("Revenue", "Sales Region"), "Revenue by Sales Region");
    }

    #[test]
    fn test_default_grouped_rule_patterns() {
        let (numeric, categorical) = GroupedInsightRule::default().compile().unwrap();
        assert!(numeric.is_match("Salary"));
        assert!(!numeric.is_match("Salary2"));
        assert!(categorical.is_match("Home_DEPARTMENT"));
    }

    // ==================== serde tests ====================

    #[test]
    fn test_partial_config_from_json() {
        let json = r#"{
            "imbalance_threshold": 0.6,
            "correlation_pairing": "RowAligned",
            "grouped_insights": []
        }"#;

        let config: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.imbalance_threshold, 0.6);
        assert_eq!(config.correlation_pairing, CorrelationPairing::RowAligned);
        assert!(config.grouped_insights.is_empty());
        assert_eq!(config.histogram_bins, 10);
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = AnalysisConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: AnalysisConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
