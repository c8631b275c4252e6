//! The analysis facade: rows in, report text and chart data out.

use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::profiler::DataProfiler;
use crate::reporting::{ChartDataAggregator, ReportGenerator};
use crate::rules::{InsightEngine, RecommendationEngine, RuleEngine};
use crate::types::{ChartData, Dataset, DatasetProfile, Row};

/// Both outputs of one analysis, built from a single profile.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutput {
    pub report: String,
    pub chart_data: ChartData,
}

/// Runs the profiling, rule and rendering stages under one configuration.
///
/// Every call works on its own snapshot of the rows; an `Analyzer` can be
/// shared freely between threads.
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    config: AnalysisConfig,
}

static_assertions::assert_impl_all!(Analyzer: Send, Sync);
static_assertions::assert_impl_all!(DatasetProfile: Send, Sync);
static_assertions::assert_impl_all!(ChartData: Send, Sync);

impl Analyzer {
    /// Create an analyzer after validating `config`.
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Profile the rows without rendering anything.
    pub fn profile(&self, rows: Vec<Row>) -> Result<DatasetProfile> {
        let dataset = Dataset::from_rows(rows, self.config.schema_policy)?;
        Ok(DataProfiler::profile_dataset(&dataset, &self.config))
    }

    /// Narrative report for the rows.
    pub fn analyze(&self, rows: Vec<Row>) -> Result<String> {
        let profile = self.profile(rows)?;
        self.render_report(&profile)
    }

    /// Chart-ready summaries for the rows, with no narrative text.
    pub fn chart_data(&self, rows: Vec<Row>) -> Result<ChartData> {
        let profile = self.profile(rows)?;
        Ok(ChartDataAggregator::aggregate(&profile))
    }

    /// Report and chart data from one profiling pass; the two renderers run
    /// side by side when `parallel` is set.
    pub fn run(&self, rows: Vec<Row>) -> Result<AnalysisOutput> {
        let profile = self.profile(rows)?;
        let (report, chart_data) = if self.config.parallel {
            rayon::join(
                || self.render_report(&profile),
                || ChartDataAggregator::aggregate(&profile),
            )
        } else {
            (
                self.render_report(&profile),
                ChartDataAggregator::aggregate(&profile),
            )
        };
        Ok(AnalysisOutput {
            report: report?,
            chart_data,
        })
    }

    /// Evaluate the rule engines over `profile` and render the report.
    pub fn render_report(&self, profile: &DatasetProfile) -> Result<String> {
        let insights = InsightEngine::new(&self.config).evaluate(profile)?;
        let recommendations = RecommendationEngine::new(&self.config).evaluate(profile)?;
        debug!(
            "{} insights, {} recommendations",
            insights.len(),
            recommendations.len()
        );

        let report =
            ReportGenerator::new(&self.config).render(profile, &insights, &recommendations);
        info!(
            "Report ready: {} rows x {} columns, {} characters",
            profile.row_count,
            profile.column_count,
            report.len()
        );
        Ok(report)
    }
}

/// [`Analyzer::analyze`] with the default configuration.
pub fn analyze(rows: Vec<Row>) -> Result<String> {
    Analyzer::default().analyze(rows)
}

/// [`Analyzer::chart_data`] with the default configuration.
pub fn chart_data(rows: Vec<Row>) -> Result<ChartData> {
    Analyzer::default().chart_data(rows)
}

/// [`Analyzer::profile`] with the default configuration.
pub fn profile(rows: Vec<Row>) -> Result<DatasetProfile> {
    Analyzer::default().profile(rows)
}
