use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::config::SchemaPolicy;
use crate::error::{AnalysisError, Result};
use crate::utils::{date_to_serial, safe_ratio, serial_to_date_label};

// ============================================================================
// Cell Values and Rows
// ============================================================================

/// A single cell.
///
/// Numbers compare and hash by bit pattern so that values can be counted in
/// hash maps; `NaN` equals itself and `0.0` differs from `-0.0`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(untagged)]
pub enum Value {
    #[default]
    Null,
    Number(f64),
    String(String),
    Boolean(bool),
    Date(NaiveDate),
}

impl Value {
    /// Null or a string that is empty after trimming.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::String(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Numeric reading of the value. Dates read as spreadsheet serials.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Date(d) => Some(date_to_serial(*d)),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Date(a), Value::Date(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Number(n) => n.to_bits().hash(state),
            Value::String(s) => s.hash(state),
            Value::Boolean(b) => b.hash(state),
            Value::Date(d) => d.hash(state),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n as f64)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<NaiveDate> for Value {
    fn from(d: NaiveDate) -> Self {
        Value::Date(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}

/// JSON scalars map onto their natural variant; arrays and objects are kept
/// as their JSON text.
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::String(s),
            other => Value::String(other.to_string()),
        }
    }
}

/// One record: column name to value, in insertion order.
pub type Row = IndexMap<String, Value>;

/// Build a [`Row`] from `(column, value)` pairs.
pub fn row<I, K, V>(pairs: I) -> Row
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

// ============================================================================
// Dataset
// ============================================================================

/// Rows normalized to the column order of the first row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Validate row shapes against the first row and normalize key order.
    pub fn from_rows(rows: Vec<Row>, policy: SchemaPolicy) -> Result<Self> {
        let Some(first) = rows.first() else {
            return Ok(Self::default());
        };
        let columns: Vec<String> = first.keys().cloned().collect();

        let mut normalized = Vec::with_capacity(rows.len());
        for (index, mut row) in rows.into_iter().enumerate() {
            if policy == SchemaPolicy::Strict {
                if let Some(missing) = columns.iter().find(|c| !row.contains_key(*c)) {
                    return Err(AnalysisError::SchemaMismatch {
                        row: index,
                        column: missing.clone(),
                    });
                }
                if row.len() != columns.len()
                    && let Some(extra) = row.keys().find(|k| !columns.contains(*k))
                {
                    return Err(AnalysisError::UnexpectedColumn {
                        row: index,
                        column: extra.clone(),
                    });
                }
            }

            let ordered: Row = columns
                .iter()
                .map(|c| (c.clone(), row.swap_remove(c).unwrap_or(Value::Null)))
                .collect();
            normalized.push(ordered);
        }

        Ok(Self {
            columns,
            rows: normalized,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All values of one column, in row order.
    pub fn column_values(&self, column: &str) -> Vec<Value> {
        self.rows
            .iter()
            .map(|r| r.get(column).cloned().unwrap_or_default())
            .collect()
    }
}

// ============================================================================
// Column Profiles
// ============================================================================

/// Inferred semantic type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnType {
    Empty,
    Numeric,
    Date,
    #[serde(rename = "ID/Text")]
    IdText,
    Categorical,
}

impl ColumnType {
    /// Label used in reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Empty => "Empty",
            ColumnType::Numeric => "Numeric",
            ColumnType::Date => "Date",
            ColumnType::IdText => "ID/Text",
            ColumnType::Categorical => "Categorical",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One histogram bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bin {
    pub label: String,
    pub count: usize,
}

/// Chart-ready summary of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub median: f64,
    #[serde(rename = "stDev")]
    pub stdev: f64,
    pub histogram_bins: Vec<Bin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericStats {
    /// Numeric values in row order, missing values removed.
    pub values: Vec<f64>,
    pub summary: NumericSummary,
    pub outliers: Vec<f64>,
}

/// Earliest and latest date of a date column, as spreadsheet serials.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DateRange {
    pub min_serial: f64,
    pub max_serial: f64,
}

impl DateRange {
    pub fn start_label(&self) -> String {
        serial_to_date_label(self.min_serial)
    }

    pub fn end_label(&self) -> String {
        serial_to_date_label(self.max_serial)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoricalStats {
    /// Label to count, in first-seen order.
    pub frequencies: IndexMap<String, usize>,
    /// Top categories plus an optional "Other" bucket, count descending.
    pub top_with_other: IndexMap<String, usize>,
    pub imbalanced: bool,
}

impl CategoricalStats {
    pub fn total(&self) -> usize {
        self.frequencies.values().sum()
    }
}

/// Type-specific statistics of a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "stats")]
pub enum ColumnStats {
    Empty,
    Numeric(NumericStats),
    Date(DateRange),
    /// Used for both categorical and ID/Text columns.
    Categorical(CategoricalStats),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnProfile {
    pub name: String,
    pub inferred_type: ColumnType,
    pub raw_values: Vec<Value>,
    pub non_null_values: Vec<Value>,
    pub missing_count: usize,
    pub unique_count: usize,
    pub stats: ColumnStats,
}

impl ColumnProfile {
    /// Share of rows where the column is missing.
    pub fn missing_ratio(&self) -> f64 {
        safe_ratio(self.missing_count, self.raw_values.len())
    }

    /// Distinct non-missing values over the row count.
    pub fn unique_ratio(&self) -> f64 {
        safe_ratio(self.unique_count, self.raw_values.len())
    }

    pub fn numeric(&self) -> Option<&NumericStats> {
        match &self.stats {
            ColumnStats::Numeric(stats) => Some(stats),
            _ => None,
        }
    }

    pub fn categorical(&self) -> Option<&CategoricalStats> {
        match &self.stats {
            ColumnStats::Categorical(stats) => Some(stats),
            _ => None,
        }
    }

    /// Non-numeric, non-date columns (including empty ones).
    pub fn is_categorical_like(&self) -> bool {
        !matches!(self.inferred_type, ColumnType::Numeric | ColumnType::Date)
    }
}

// ============================================================================
// Correlation
// ============================================================================

/// Symmetric column-to-column Pearson coefficients over numeric columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationMatrix(IndexMap<String, IndexMap<String, f64>>);

impl CorrelationMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a column so it keeps its position even without entries.
    pub fn add_column(&mut self, column: &str) {
        self.0.entry(column.to_string()).or_default();
    }

    /// Insert a coefficient in both directions.
    pub fn insert(&mut self, a: &str, b: &str, coefficient: f64) {
        self.0
            .entry(a.to_string())
            .or_default()
            .insert(b.to_string(), coefficient);
        self.0
            .entry(b.to_string())
            .or_default()
            .insert(a.to_string(), coefficient);
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        self.0.get(a).and_then(|row| row.get(b)).copied()
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Off-diagonal entries, each unordered pair once, in column order.
    pub fn pairs(&self) -> Vec<(&str, &str, f64)> {
        let names: Vec<&str> = self.columns().collect();
        let mut pairs = Vec::new();
        for (i, a) in names.iter().enumerate() {
            for b in &names[i + 1..] {
                if let Some(coefficient) = self.get(a, b) {
                    pairs.push((*a, *b, coefficient));
                }
            }
        }
        pairs
    }

    /// Coefficients between `column` and every other column, in column order.
    pub fn partners<'a>(&'a self, column: &'a str) -> impl Iterator<Item = (&'a str, f64)> + 'a {
        self.columns()
            .filter(move |other| *other != column)
            .filter_map(move |other| self.get(column, other).map(|c| (other, c)))
    }
}

// ============================================================================
// Dataset Profile
// ============================================================================

/// Everything computed about a dataset in one analysis call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatasetProfile {
    pub row_count: usize,
    pub column_count: usize,
    pub column_profiles: Vec<ColumnProfile>,
    pub correlation: CorrelationMatrix,
    /// Every repeat occurrence, first occurrences excluded.
    pub duplicate_rows: Vec<Row>,
    pub empty_cell_count: usize,
    pub quality_score: f64,
}

impl DatasetProfile {
    pub fn empty_ratio(&self) -> f64 {
        safe_ratio(self.empty_cell_count, self.row_count * self.column_count)
    }

    pub fn duplicate_ratio(&self) -> f64 {
        safe_ratio(self.duplicate_rows.len(), self.row_count)
    }

    pub fn column(&self, name: &str) -> Option<&ColumnProfile> {
        self.column_profiles.iter().find(|p| p.name == name)
    }

    pub fn numeric_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.column_profiles
            .iter()
            .filter(|p| p.inferred_type == ColumnType::Numeric)
    }

    pub fn categorical_like_columns(&self) -> impl Iterator<Item = &ColumnProfile> {
        self.column_profiles
            .iter()
            .filter(|p| p.is_categorical_like())
    }
}

// ============================================================================
// Insights and Recommendations
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsightKind {
    SuspiciousCorrelation,
    StrongCorrelation,
    Imbalance,
    Grouped,
}

impl InsightKind {
    /// Correlation insights go to the correlation section, the rest to the
    /// distribution section.
    pub fn is_correlation(&self) -> bool {
        matches!(
            self,
            InsightKind::SuspiciousCorrelation | InsightKind::StrongCorrelation
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InsightRecord {
    pub kind: InsightKind,
    pub columns: Vec<String>,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationKind {
    RemoveDuplicates,
    DropColumn,
    ImputeMissing,
    InvestigateOutliers,
    CheckRedundancy,
    DropConstant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRecord {
    pub kind: RecommendationKind,
    pub columns: Vec<String>,
    pub text: String,
}

// ============================================================================
// Chart Data
// ============================================================================

/// Structured, narrative-free summary consumed by chart front ends.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub numeric_data: IndexMap<String, NumericSummary>,
    pub categorical_frequencies: IndexMap<String, IndexMap<String, usize>>,
    pub correlation_matrix: CorrelationMatrix,
}

impl ChartData {
    pub fn is_empty(&self) -> bool {
        self.numeric_data.is_empty()
            && self.categorical_frequencies.is_empty()
            && self.correlation_matrix.is_empty()
    }
}
