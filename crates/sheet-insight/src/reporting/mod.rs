//! Report and chart rendering.
//!
//! [`ReportGenerator`] turns a profile plus its insight and recommendation
//! records into the narrative report. [`ChartDataAggregator`] extracts the
//! structured data used to draw charts.

mod charts;
mod generator;

pub use charts::ChartDataAggregator;
pub use generator::{EMPTY_DATASET_MESSAGE, ReportGenerator};
