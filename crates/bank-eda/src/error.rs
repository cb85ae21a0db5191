//! Error types for the analysis engine.
//!
//! Every failure the dashboard can hit is recoverable at the interaction
//! boundary: a bad file, a view opened before anything was loaded, or a
//! selection that makes no sense (same column on both axes, a single column
//! for a correlation). Statistically undefined results are *not* errors;
//! they surface as `None` in the result types.
//!
//! Errors are serializable so a front end can show `code` + `message`.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for dataset loading and analysis.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The file could not be read or parsed as a `;`-separated table.
    #[error("Failed to load '{source_name}': {reason}")]
    LoadFailed { source_name: String, reason: String },

    /// A view was requested before any dataset was loaded.
    #[error("No data loaded")]
    NoDataLoaded,

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A numeric operation was requested on a non-numeric column.
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),

    /// A categorical operation was requested on a numeric column.
    #[error("Column '{0}' is not categorical")]
    NotCategorical(String),

    /// The same column was selected for both axes of a crosstab.
    #[error("Column '{0}' was selected twice; choose two different columns")]
    DuplicateSelection(String),

    /// Not enough columns were selected for the operation.
    #[error("At least {required} columns must be selected, got {selected}")]
    InsufficientSelection { required: usize, selected: usize },

    /// Range filter bounds are inverted or not finite.
    #[error("Invalid range: min {min} is greater than max {max}")]
    InvalidRange { min: f64, max: f64 },

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

    /// Build a load failure for the given source.
    pub fn load_failed(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalysisError::LoadFailed {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Get error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LoadFailed { .. } => "LOAD_FAILED",
            Self::NoDataLoaded => "NO_DATA_LOADED",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::NotNumeric(_) => "NOT_NUMERIC",
            Self::NotCategorical(_) => "NOT_CATEGORICAL",
            Self::DuplicateSelection(_) => "DUPLICATE_SELECTION",
            Self::InsufficientSelection { .. } => "INSUFFICIENT_SELECTION",
            Self::InvalidRange { .. } => "INVALID_RANGE",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Whether the user can fix this by changing the selection in the UI.
    pub fn is_invalid_selection(&self) -> bool {
        match self {
            Self::DuplicateSelection(_)
            | Self::InsufficientSelection { .. }
            | Self::InvalidRange { .. }
            | Self::NotNumeric(_)
            | Self::NotCategorical(_)
            | Self::ColumnNotFound(_) => true,
            Self::WithContext { source, .. } => source.is_invalid_selection(),
            _ => false,
        }
    }

    /// Check if this error is recoverable at the interaction boundary.
    ///
    /// Only wrapped library errors raised outside of a load are treated as
    /// unexpected; everything else just needs a message in the UI.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Io(_) | Self::Polars(_) | Self::Json(_) => false,
            Self::WithContext { source, .. } => source.is_recoverable(),
            _ => true,
        }
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

static_assertions::assert_impl_all!(AnalysisError: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        assert_eq!(AnalysisError::NoDataLoaded.error_code(), "NO_DATA_LOADED");
        assert_eq!(
            AnalysisError::DuplicateSelection("job".to_string()).error_code(),
            "DUPLICATE_SELECTION"
        );
        assert_eq!(
            AnalysisError::load_failed("bank.csv", "empty").error_code(),
            "LOAD_FAILED"
        );
    }

    #[test]
    fn test_is_invalid_selection() {
        assert!(AnalysisError::DuplicateSelection("job".to_string()).is_invalid_selection());
        assert!(
            AnalysisError::InsufficientSelection {
                required: 2,
                selected: 1
            }
            .is_invalid_selection()
        );
        assert!(!AnalysisError::NoDataLoaded.is_invalid_selection());
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AnalysisError::NoDataLoaded.is_recoverable());
        assert!(AnalysisError::load_failed("x.csv", "bad header").is_recoverable());
        let io = std::io::Error::other("disk on fire");
        assert!(!AnalysisError::Io(io).is_recoverable());
    }

    #[test]
    fn test_error_serialization() {
        let error = AnalysisError::ColumnNotFound("age".to_string());
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("COLUMN_NOT_FOUND"));
        assert!(json.contains("age"));
    }

    #[test]
    fn test_with_context() {
        let error = AnalysisError::NotNumeric("job".to_string()).with_context("Correlation view");
        assert!(error.to_string().contains("Correlation view"));
        assert_eq!(error.error_code(), "NOT_NUMERIC");
        assert!(error.is_invalid_selection());
    }
}
