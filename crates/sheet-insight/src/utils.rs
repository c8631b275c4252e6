//! Shared helpers: ratio guards, spreadsheet date serials, and the one place
//! where numbers are turned into report text.

use chrono::{NaiveDate, TimeDelta};
use once_cell::sync::Lazy;

use crate::types::Row;

// =============================================================================
// Date Serials
// =============================================================================

/// Days between the spreadsheet epoch (1899-12-30) and 1970-01-01.
pub const EXCEL_EPOCH_OFFSET: f64 = 25569.0;

static SPREADSHEET_EPOCH: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1899, 12, 30).expect("valid epoch date"));

static UNIX_EPOCH_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(1970, 1, 1).expect("valid epoch date"));

/// Inclusive serial range treated as a plausible date: 1970-01-01 to 2100-01-01.
pub static DATE_SERIAL_RANGE: Lazy<(f64, f64)> = Lazy::new(|| {
    let upper = NaiveDate::from_ymd_opt(2100, 1, 1).expect("valid upper date bound");
    (date_to_serial(*UNIX_EPOCH_DATE), date_to_serial(upper))
});

/// Convert a calendar date to a spreadsheet serial.
pub fn date_to_serial(date: NaiveDate) -> f64 {
    date.signed_duration_since(*UNIX_EPOCH_DATE).num_days() as f64 + EXCEL_EPOCH_OFFSET
}

/// Calendar date `days` after 1970-01-01, the encoding of columnar date types.
pub fn date_from_unix_days(days: i32) -> Option<NaiveDate> {
    TimeDelta::try_days(i64::from(days)).and_then(|delta| UNIX_EPOCH_DATE.checked_add_signed(delta))
}

/// Check whether a number falls in the plausible date-serial range.
#[inline]
pub fn is_date_serial(value: f64) -> bool {
    let (lower, upper) = *DATE_SERIAL_RANGE;
    (lower..=upper).contains(&value)
}

/// Render a spreadsheet serial as `YYYY-MM-DD`, or `N/A` when it is not a
/// positive, representable day count.
pub fn serial_to_date_label(serial: f64) -> String {
    if serial.is_nan() || serial <= 0.0 {
        return "N/A".to_string();
    }
    TimeDelta::try_days(serial.floor() as i64)
        .and_then(|days| SPREADSHEET_EPOCH.checked_add_signed(days))
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

// =============================================================================
// Ratios and Formatting
// =============================================================================

/// `numerator / denominator`, or 0 when the denominator is zero.
#[inline]
pub fn safe_ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Decimal places used when printing a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precision {
    /// `42%`, used in free-text summaries.
    Whole,
    /// `42.1`, used for category shares and recommendations.
    Short,
    /// `42.13`, used in quality and column statistics.
    Detail,
}

/// Format a ratio in [0, 1] as a percentage number (no `%` sign).
pub fn format_percent(ratio: f64, precision: Precision) -> String {
    let pct = ratio * 100.0;
    match precision {
        Precision::Whole => format!("{pct:.0}"),
        Precision::Short => format!("{pct:.1}"),
        Precision::Detail => format!("{pct:.2}"),
    }
}

/// Format a magnitude (statistic, coefficient, bin edge).
#[inline]
pub fn format_magnitude(value: f64) -> String {
    format!("{value:.2}")
}

/// Render a row as `{col=value, ...}`.
pub fn format_row(row: &Row) -> String {
    let cells: Vec<String> = row.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{{{}}}", cells.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Value, row};

    #[test]
    fn test_date_serial_range_bounds() {
        let (lower, upper) = *DATE_SERIAL_RANGE;
        assert_eq!(lower, 25569.0);
        assert_eq!(upper, 73051.0);
        assert!(is_date_serial(45000.0));
        assert!(!is_date_serial(20.0));
        assert!(!is_date_serial(73052.0));
    }

    #[test]
    fn test_date_to_serial() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(date_to_serial(date), 45306.0);
    }

    #[test]
    fn test_date_from_unix_days() {
        assert_eq!(date_from_unix_days(0), NaiveDate::from_ymd_opt(1970, 1, 1));
        assert_eq!(date_from_unix_days(19737), NaiveDate::from_ymd_opt(2024, 1, 15));
        assert_eq!(date_from_unix_days(-1), NaiveDate::from_ymd_opt(1969, 12, 31));
    }

    #[test]
    fn test_serial_to_date_label() {
        assert_eq!(serial_to_date_label(45306.0), "2024-01-15");
        assert_eq!(serial_to_date_label(45306.7), "2024-01-15");
        assert_eq!(serial_to_date_label(1.0), "1899-12-31");
        assert_eq!(serial_to_date_label(0.0), "N/A");
        assert_eq!(serial_to_date_label(-5.0), "N/A");
        assert_eq!(serial_to_date_label(f64::NAN), "N/A");
        assert_eq!(serial_to_date_label(1e300), "N/A");
    }

    #[test]
    fn test_safe_ratio() {
        assert_eq!(safe_ratio(1, 4), 0.25);
        assert_eq!(safe_ratio(3, 0), 0.0);
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.123456, Precision::Detail), "12.35");
        assert_eq!(format_percent(0.123456, Precision::Short), "12.3");
        assert_eq!(format_percent(0.125, Precision::Whole), "12");
        assert_eq!(format_percent(1.0, Precision::Detail), "100.00");
    }

    #[test]
    fn test_format_magnitude() {
        assert_eq!(format_magnitude(3.14159), "3.14");
        assert_eq!(format_magnitude(-0.5), "-0.50");
    }

    #[test]
    fn test_format_row() {
        let r = row([("age", Value::from(20)), ("dept", Value::from("A"))]);
        assert_eq!(format_row(&r), "{age=20, dept=A}");
    }
}
