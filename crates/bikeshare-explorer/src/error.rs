//! Custom error types for the bikeshare explorer.
//!
//! All library operations return [`ExplorerError`]. Errors serialize as a
//! `{code, message}` pair so `--json` mode can emit them alongside reports.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for loading and reporting on trip data.
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// The configured source file for a city does not exist.
    #[error("No trip data for {city}: '{}' does not exist", path.display())]
    SourceNotFound { city: String, path: PathBuf },

    /// A required column is missing from the source file.
    #[error("Column '{0}' not found in dataset")]
    MissingColumn(String),

    /// A start timestamp could not be parsed.
    #[error("Unparseable start time '{value}' at row {row}")]
    TimestampParse { row: usize, value: String },

    /// A numeric column holds a value that does not parse as a number.
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        column: String,
        row: usize,
        value: String,
    },

    /// The input stream ended while a prompt was waiting for an answer.
    #[error("Input ended while waiting for {field}")]
    InputExhausted { field: String },

    /// Too many invalid answers were given for a prompt.
    #[error("No valid {field} after {attempts} attempts")]
    TooManyAttempts { field: String, attempts: usize },

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

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
        source: Box<ExplorerError>,
    },
}

impl ExplorerError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        ExplorerError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for the error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::SourceNotFound { .. } => "SOURCE_NOT_FOUND",
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::TimestampParse { .. } => "TIMESTAMP_PARSE",
            Self::InvalidValue { .. } => "INVALID_VALUE",
            Self::InputExhausted { .. } => "INPUT_EXHAUSTED",
            Self::TooManyAttempts { .. } => "TOO_MANY_ATTEMPTS",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error came from the interactive input side rather than the data.
    pub fn is_input_error(&self) -> bool {
        match self {
            Self::InputExhausted { .. } | Self::TooManyAttempts { .. } => true,
            Self::WithContext { source, .. } => source.is_input_error(),
            _ => false,
        }
    }
}

impl Serialize for ExplorerError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("ExplorerError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for explorer operations.
pub type Result<T> = std::result::Result<T, ExplorerError>;

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
        self.map_err(|e| ExplorerError::Polars(e).with_context(context))
    }
}
