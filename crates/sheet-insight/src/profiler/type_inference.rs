//! Type inference for column values.
//!
//! A column is numeric when more than `numeric_ratio_threshold` of its
//! non-missing values are numbers; a numeric column whose values are mostly
//! native dates, or numbers in the plausible spreadsheet date-serial range, is
//! a date column. Everything
//! else is either an identifier-like text column (all values distinct) or a
//! categorical one.

use std::collections::HashSet;

use crate::config::AnalysisConfig;
use crate::types::{ColumnType, Value};
use crate::utils::is_date_serial;

/// Classify a column from its raw values.
pub(crate) fn infer_column_type(values: &[Value], config: &AnalysisConfig) -> ColumnType {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_missing()).collect();
    if present.is_empty() {
        return ColumnType::Empty;
    }

    let numeric_count = present.iter().filter(|v| v.as_f64().is_some()).count();
    let numeric_ratio = numeric_count as f64 / present.len() as f64;

    if numeric_ratio > config.numeric_ratio_threshold {
        let date_like = present
            .iter()
            .filter(|v| match v {
                Value::Date(_) => true,
                Value::Number(n) => is_date_serial(*n),
                _ => false,
            })
            .count();
        if date_like as f64 / numeric_count as f64 > config.date_ratio_threshold {
            return ColumnType::Date;
        }
        return ColumnType::Numeric;
    }

    let distinct: HashSet<&Value> = present.iter().copied().collect();
    if distinct.len() == present.len() {
        ColumnType::IdText
    } else {
        ColumnType::Categorical
    }
}
