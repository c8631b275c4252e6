//! Dataset-level quality measures: duplicate rows, empty cells and the
//! composite quality score.

mod analyzer;

pub use analyzer::DataQualityAnalyzer;
