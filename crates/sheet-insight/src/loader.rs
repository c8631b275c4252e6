//! Reading tabular files into [`Row`]s.
//!
//! CSV goes through polars with date parsing enabled, so native date columns
//! arrive as [`Value::Date`]. JSON input must be an array of objects.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use tracing::{debug, info};

use crate::error::{AnalysisError, Result, ResultExt};
use crate::types::{Row, Value};
use crate::utils::date_from_unix_days;

/// Load rows from a `.csv` or `.json` file, chosen by extension.
pub fn load_rows(path: &Path) -> Result<Vec<Row>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let rows = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("json") => read_json(path)?,
        _ => {
            return Err(AnalysisError::UnsupportedInput(format!(
                "expected a .csv or .json file, got {}",
                path.display()
            )));
        }
    };
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Read a CSV file with a header row.
pub fn read_csv(path: &Path) -> Result<Vec<Row>> {
    let df = CsvReadOptions::default()
        .with_infer_schema_length(Some(100))
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(PathBuf::from(path)))
        .context(format!("Failed to open {}", path.display()))?
        .finish()
        .context(format!("Failed to parse {}", path.display()))?;
    debug!("CSV shape: {:?}", df.shape());
    dataframe_to_rows(&df)
}

/// Read a JSON array of row objects.
pub fn read_json(path: &Path) -> Result<Vec<Row>> {
    let text =
        std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
    parse_json_rows(&text)
}

/// Parse a JSON array of objects; scalars keep their natural type.
pub fn parse_json_rows(text: &str) -> Result<Vec<Row>> {
    let serde_json::Value::Array(items) = serde_json::from_str::<serde_json::Value>(text)? else {
        return Err(AnalysisError::UnsupportedInput(
            "JSON input must be an array of row objects".to_string(),
        ));
    };
    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            serde_json::Value::Object(fields) => Ok(fields
                .into_iter()
                .map(|(key, value)| (key, Value::from(value)))
                .collect()),
            _ => Err(AnalysisError::UnsupportedInput(format!(
                "JSON row {index} is not an object"
            ))),
        })
        .collect()
}

/// Convert a DataFrame into rows keyed by column name, in column order.
///
/// | polars dtype      | value            |
/// |-------------------|------------------|
/// | integers, floats  | `Number`         |
/// | Boolean           | `Boolean`        |
/// | Date              | `Date`           |
/// | everything else   | `String`         |
///
/// Nulls and NaN become `Null`.
pub fn dataframe_to_rows(df: &DataFrame) -> Result<Vec<Row>> {
    let columns: Vec<(String, Vec<Value>)> = df
        .get_columns()
        .iter()
        .map(|col| {
            let series = col.as_materialized_series();
            Ok((series.name().to_string(), series_values(series)?))
        })
        .collect::<Result<_>>()?;

    Ok((0..df.height())
        .map(|i| {
            columns
                .iter()
                .map(|(name, values)| (name.clone(), values[i].clone()))
                .collect()
        })
        .collect())
}

fn series_values(series: &Series) -> Result<Vec<Value>> {
    let dtype = series.dtype();
    let values = if is_numeric_dtype(dtype) {
        let floats = series.cast(&DataType::Float64)?;
        floats
            .f64()?
            .into_iter()
            .map(|v| Value::from(v.filter(|f| !f.is_nan())))
            .collect()
    } else if matches!(dtype, DataType::Boolean) {
        series.bool()?.into_iter().map(Value::from).collect()
    } else if matches!(dtype, DataType::Date) {
        let days = series.cast(&DataType::Int32)?;
        days.i32()?
            .into_iter()
            .map(|d| Value::from(d.and_then(date_from_unix_days)))
            .collect()
    } else {
        let strings = series.cast(&DataType::String)?;
        strings.str()?.into_iter().map(Value::from).collect()
    };
    Ok(values)
}

fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    // ==================== dataframe tests ====================

    #[test]
    fn test_dataframe_to_rows_keeps_column_order() {
        let df = df!(
            "age" => [Some(20i64), None, Some(35)],
            "dept" => [Some("A"), Some("B"), None],
            "active" => [true, false, true]
        )
        .unwrap();
        let rows = dataframe_to_rows(&df).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(
            rows[0].keys().map(String::as_str).collect::<Vec<_>>(),
            vec!["age", "dept", "active"]
        );
        assert_eq!(rows[0]["age"], Value::Number(20.0));
        assert_eq!(rows[1]["age"], Value::Null);
        assert_eq!(rows[2]["dept"], Value::Null);
        assert_eq!(rows[1]["active"], Value::Boolean(false));
    }

    #[test]
    fn test_nan_becomes_null() {
        let df = df!("x" => [1.5f64, f64::NAN]).unwrap();
        let rows = dataframe_to_rows(&df).unwrap();
        assert_eq!(rows[0]["x"], Value::Number(1.5));
        assert_eq!(rows[1]["x"], Value::Null);
    }

    #[test]
    fn test_date_column_becomes_dates() {
        let days = Series::new("when".into(), [19737i32, 0]);
        let dates = days.cast(&DataType::Date).unwrap();
        let df = DataFrame::new(vec![dates.into()]).unwrap();
        let rows = dataframe_to_rows(&df).unwrap();
        assert_eq!(
            rows[0]["when"],
            Value::Date(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
        assert_eq!(
            rows[1]["when"],
            Value::Date(NaiveDate::from_ymd_opt(1970, 1, 1).unwrap())
        );
    }

    // ==================== json tests ====================

    #[test]
    fn test_parse_json_rows() {
        let rows =
            parse_json_rows(r#"[{"age": 20, "dept": "A"}, {"age": null, "dept": "B", "ok": true}]"#)
                .unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["age"], Value::Number(20.0));
        assert_eq!(rows[1]["age"], Value::Null);
        assert_eq!(rows[1]["ok"], Value::Boolean(true));
    }

    #[test]
    fn test_parse_json_rejects_non_array() {
        let err = parse_json_rows(r#"{"age": 20}"#).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
    }

    #[test]
    fn test_parse_json_rejects_scalar_rows() {
        let err = parse_json_rows("[1, 2]").unwrap_err();
        assert!(err.to_string().contains("JSON row 0"));
    }

    #[test]
    fn test_parse_json_syntax_error() {
        let err = parse_json_rows("[{").unwrap_err();
        assert_eq!(err.error_code(), "JSON_ERROR");
    }

    #[test]
    fn test_load_rows_rejects_unknown_extension() {
        let err = load_rows(Path::new("data.xlsx")).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_INPUT");
    }
}
