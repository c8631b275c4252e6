//! Custom error types for dataset analysis.
//!
//! Profiling itself never fails on well-formed input; errors are limited to
//! malformed dataset shapes, invalid configuration and the I/O performed by
//! the input loaders.
//!
//! Errors serialize as `{code, message}` so callers embedding the analyzer
//! behind an API can forward them unchanged.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::config::ConfigValidationError;

/// The main error type for dataset analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// A row lacks a column that the first row defines.
    #[error("Row {row} is missing column '{column}' defined by the first row")]
    SchemaMismatch { row: usize, column: String },

    /// A row carries a column that the first row does not define.
    #[error("Row {row} has unexpected column '{column}' not present in the first row")]
    UnexpectedColumn { row: usize, column: String },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input could not be interpreted as rows.
    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        AnalysisError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable error code for programmatic handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SchemaMismatch { .. } => "SCHEMA_MISMATCH",
            Self::UnexpectedColumn { .. } => "UNEXPECTED_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnsupportedInput(_) => "UNSUPPORTED_INPUT",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if the error stems from the shape of the input rows.
    pub fn is_schema_error(&self) -> bool {
        match self {
            Self::SchemaMismatch { .. } | Self::UnexpectedColumn { .. } => true,
            Self::WithContext { source, .. } => source.is_schema_error(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for AnalysisError {
    fn from(err: ConfigValidationError) -> Self {
        AnalysisError::InvalidConfig(err.to_string())
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for AnalysisError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("AnalysisError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| AnalysisError::Io(e).with_context(context))
    }
}
