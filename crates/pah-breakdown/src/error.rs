//! Error types for the breakdown pipeline.
//!
//! A single `thiserror` hierarchy covers schema, I/O, parsing and
//! configuration failures. Errors serialize to `{code, message}` so a
//! summary consumer (e.g. `--json` output) can report them uniformly.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the breakdown pipeline.
#[derive(Error, Debug)]
pub enum BreakdownError {
    /// A required column is absent from the input table.
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Input file does not exist and sample data generation is disabled.
    #[error("Data file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// A numeric column holds a value that does not parse.
    #[error("Failed to convert column '{column}' to {target_type}: {reason}")]
    TypeConversionFailed {
        column: String,
        target_type: String,
        reason: String,
    },

    /// Configuration rejected by the builder.
    #[error(transparent)]
    Config(#[from] ConfigValidationError),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<BreakdownError>,
    },
}

impl BreakdownError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        BreakdownError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Stable machine-readable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingColumn(_) => "MISSING_COLUMN",
            Self::InputNotFound(_) => "INPUT_NOT_FOUND",
            Self::TypeConversionFailed { .. } => "TYPE_CONVERSION_FAILED",
            Self::Config(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this is a schema error (missing required column).
    pub fn is_schema_error(&self) -> bool {
        match self {
            Self::MissingColumn(_) => true,
            Self::WithContext { source, .. } => source.is_schema_error(),
            _ => false,
        }
    }

    /// Name of the missing column, if this is a schema error.
    pub fn missing_column(&self) -> Option<&str> {
        match self {
            Self::MissingColumn(name) => Some(name),
            Self::WithContext { source, .. } => source.missing_column(),
            _ => None,
        }
    }
}

impl Serialize for BreakdownError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("BreakdownError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, BreakdownError>;

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
        self.map_err(|e| BreakdownError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| BreakdownError::Io(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(
            BreakdownError::MissingColumn("sample_id".to_string()).error_code(),
            "MISSING_COLUMN"
        );
        assert_eq!(
            BreakdownError::InputNotFound(PathBuf::from("data/x.csv")).error_code(),
            "INPUT_NOT_FOUND"
        );
    }

    #[test]
    fn test_missing_column_message_names_column() {
        let error = BreakdownError::MissingColumn("pah_concentration_end".to_string());
        assert_eq!(
            error.to_string(),
            "Missing required column: pah_concentration_end"
        );
    }

    #[test]
    fn test_error_serialization() {
        let error = BreakdownError::MissingColumn("soil_moisture_pct".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MISSING_COLUMN"));
        assert!(json.contains("soil_moisture_pct"));
    }

    #[test]
    fn test_with_context_preserves_code_and_column() {
        let error = BreakdownError::MissingColumn("sample_id".to_string())
            .with_context("Loading data/experiment_data.csv");
        assert!(error.to_string().contains("Loading data/experiment_data.csv"));
        assert_eq!(error.error_code(), "MISSING_COLUMN");
        assert!(error.is_schema_error());
        assert_eq!(error.missing_column(), Some("sample_id"));
    }

    #[test]
    fn test_config_error_code() {
        let error: BreakdownError = ConfigValidationError::InvalidPreviewRows(0).into();
        assert_eq!(error.error_code(), "INVALID_CONFIG");
        assert!(error.to_string().contains("preview rows"));
    }

    #[test]
    fn test_io_context() {
        let io: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let error = io.context("Writing results").unwrap_err();
        assert_eq!(error.error_code(), "IO_ERROR");
        assert!(!error.is_schema_error());
    }
}
