//! Tabular Dataset Profiler
//!
//! Turns a table of rows into a narrative data-quality report and a set of
//! chart-ready summaries.
//!
//! # Overview
//!
//! - **Type Inference**: each column is classified as Empty, Numeric, Date,
//!   ID/Text or Categorical
//! - **Descriptive Statistics**: min/max/mean/median/stdev, IQR outliers and
//!   equal-width histograms for numeric columns
//! - **Categorical Summaries**: frequency tables, top-N with an "Other"
//!   bucket, imbalance detection
//! - **Correlation**: pairwise Pearson coefficients across numeric columns
//! - **Data Quality**: duplicate rows, empty cells and a composite score
//! - **Rules**: observational insights and actionable recommendations
//! - **Rendering**: an ordered markdown report and a serializable
//!   [`ChartData`] structure
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use sheet_insight::{Analyzer, AnalysisConfig, Value, row};
//!
//! let rows = vec![
//!     row([("age", Value::from(20)), ("dept", Value::from("A"))]),
//!     row([("age", Value::from(21)), ("dept", Value::from("A"))]),
//!     row([("age", Value::from(20)), ("dept", Value::from("B"))]),
//!     row([("age", Value::from(999)), ("dept", Value::from("A"))]),
//! ];
//!
//! // Default thresholds
//! let report = sheet_insight::analyze(rows.clone())?;
//! println!("{report}");
//!
//! // Custom thresholds
//! let config = AnalysisConfig::builder()
//!     .strong_correlation_threshold(0.6)
//!     .report_top_categories(3)
//!     .build()?;
//! let charts = Analyzer::new(config)?.chart_data(rows)?;
//! println!("{}", serde_json::to_string_pretty(&charts)?);
//! ```
//!
//! # Loading Files
//!
//! The [`loader`] module reads CSV (through polars) and JSON arrays of row
//! objects into the same [`Row`] representation:
//!
//! ```rust,ignore
//! let rows = sheet_insight::loader::load_rows(Path::new("employees.csv"))?;
//! let output = Analyzer::default().run(rows)?;
//! ```

pub mod analyzer;
pub mod config;
pub mod error;
pub mod loader;
pub mod profiler;
pub mod quality;
pub mod reporting;
pub mod rules;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use analyzer::{AnalysisOutput, Analyzer, analyze, chart_data, profile};
pub use config::{
    AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, CorrelationPairing,
    GroupedInsightRule, QuartileMethod, SchemaPolicy,
};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use profiler::{DataProfiler, OTHER_LABEL};
pub use quality::DataQualityAnalyzer;
pub use reporting::{ChartDataAggregator, EMPTY_DATASET_MESSAGE, ReportGenerator};
pub use rules::{InsightEngine, RecommendationEngine, RuleEngine};
pub use types::{
    Bin, CategoricalStats, ChartData, ColumnProfile, ColumnStats, ColumnType, CorrelationMatrix,
    Dataset, DatasetProfile, DateRange, InsightKind, InsightRecord, NumericStats, NumericSummary,
    RecommendationKind, RecommendationRecord, Row, Value, row,
};
