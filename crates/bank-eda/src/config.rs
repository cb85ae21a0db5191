//! Configuration types for loading and analysing a dataset.
//!
//! This module provides configuration options using the builder pattern,
//! and can also be deserialized from a JSON file (`--config` on the CLI).

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{AnalysisError, Result};

/// Tokens treated as missing when reading a table.
pub const DEFAULT_NULL_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Column names and labels used by the findings view.
///
/// Defaults match the bank marketing dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FindingsConfig {
    /// Outcome column (did the client subscribe a term deposit).
    pub target_column: String,
    /// Value of the target column counted as an acceptance.
    pub positive_label: String,
    /// Value of the target column counted as a rejection. Rows matching
    /// neither label only count towards the acceptance rate denominator.
    pub negative_label: String,
    pub age_column: String,
    pub duration_column: String,
    pub job_column: String,
    pub education_column: String,
    pub contact_column: String,
}

impl Default for FindingsConfig {
    fn default() -> Self {
        Self {
            target_column: "y".to_string(),
            positive_label: "yes".to_string(),
            negative_label: "no".to_string(),
            age_column: "age".to_string(),
            duration_column: "duration".to_string(),
            job_column: "job".to_string(),
            education_column: "education".to_string(),
            contact_column: "contact".to_string(),
        }
    }
}

/// Configuration for the analysis engine.
///
/// Use [`AnalysisConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use bank_eda::config::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .separator(b';')
///     .histogram_bins(40)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Field separator of the input file.
    /// Default: `;`
    pub separator: u8,

    /// Number of rows polars samples to infer column types.
    /// `None` scans the whole file.
    /// Default: None
    pub infer_schema_length: Option<usize>,

    /// Cell values read as missing in every column, besides empty fields.
    /// Default: the usual spreadsheet markers (`NA`, `N/A`, `NaN`, `null`, ...)
    pub null_values: Vec<String>,

    /// Number of bins for histograms.
    /// Default: 30
    pub histogram_bins: usize,

    /// Number of rows shown in table previews.
    /// Default: 20
    pub preview_rows: usize,

    /// How many numeric columns the distribution and comparison views
    /// select when the caller does not pick any.
    /// Default: 3
    pub default_numeric_selection: usize,

    /// How many numeric columns the correlation view selects by default.
    /// Default: 5
    pub default_correlation_selection: usize,

    /// Decimal places kept in missing-value percentages.
    /// Default: 2
    pub percentage_decimals: u32,

    /// Column names for the findings view.
    pub findings: FindingsConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            separator: b';',
            infer_schema_length: None,
            null_values: DEFAULT_NULL_VALUES.iter().map(|v| v.to_string()).collect(),
            histogram_bins: 30,
            preview_rows: 20,
            default_numeric_selection: 3,
            default_correlation_selection: 5,
            percentage_decimals: 2,
            findings: FindingsConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Create a new configuration builder.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::default()
    }

    /// Read and validate a configuration from a JSON file.
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: AnalysisConfig = serde_json::from_str(&content)?;
        config
            .validate()
            .map_err(|e| AnalysisError::InvalidConfig(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> std::result::Result<(), ConfigValidationError> {
        if matches!(self.separator, b'\n' | b'\r' | b'"') {
            return Err(ConfigValidationError::InvalidSeparator(self.separator as char));
        }

        if self.infer_schema_length == Some(0) {
            return Err(ConfigValidationError::InvalidCount {
                field: "infer_schema_length".to_string(),
                value: 0,
            });
        }

        for (field, value) in [
            ("histogram_bins", self.histogram_bins),
            ("preview_rows", self.preview_rows),
        ] {
            if value == 0 {
                return Err(ConfigValidationError::InvalidCount {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if self.default_correlation_selection < 2 {
            return Err(ConfigValidationError::InvalidCorrelationSelection(
                self.default_correlation_selection,
            ));
        }

        if self.percentage_decimals > 10 {
            return Err(ConfigValidationError::InvalidDecimals(
                self.percentage_decimals,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid separator {0:?} (newline and quote characters are reserved)")]
    InvalidSeparator(char),

    #[error("Invalid value for '{field}': {value} (must be at least 1)")]
    InvalidCount { field: String, value: usize },

    #[error("Invalid default correlation selection: {0} (must be at least 2)")]
    InvalidCorrelationSelection(usize),

    #[error("Invalid percentage decimals: {0} (must be at most 10)")]
    InvalidDecimals(u32),
}

impl From<ConfigValidationError> for AnalysisError {
    fn from(error: ConfigValidationError) -> Self {
        AnalysisError::InvalidConfig(error.to_string())
    }
}

/// Builder for [`AnalysisConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct AnalysisConfigBuilder {
    separator: Option<u8>,
    infer_schema_length: Option<Option<usize>>,
    null_values: Option<Vec<String>>,
    histogram_bins: Option<usize>,
    preview_rows: Option<usize>,
    default_numeric_selection: Option<usize>,
    default_correlation_selection: Option<usize>,
    percentage_decimals: Option<u32>,
    findings: Option<FindingsConfig>,
}

impl AnalysisConfigBuilder {
    /// Set the field separator of the input file.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Set how many rows are sampled for type inference (`None` = all rows).
    pub fn infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = Some(rows);
        self
    }

    /// Set the cell values read as missing (an empty list disables them).
    pub fn null_values(mut self, values: Vec<String>) -> Self {
        self.null_values = Some(values);
        self
    }

    /// Set the number of histogram bins.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.histogram_bins = Some(bins);
        self
    }

    /// Set the number of rows shown in previews.
    pub fn preview_rows(mut self, rows: usize) -> Self {
        self.preview_rows = Some(rows);
        self
    }

    /// Set the default number of numeric columns for distribution views.
    pub fn default_numeric_selection(mut self, count: usize) -> Self {
        self.default_numeric_selection = Some(count);
        self
    }

    /// Set the default number of numeric columns for the correlation view.
    pub fn default_correlation_selection(mut self, count: usize) -> Self {
        self.default_correlation_selection = Some(count);
        self
    }

    /// Set the decimal places kept in missing-value percentages.
    pub fn percentage_decimals(mut self, decimals: u32) -> Self {
        self.percentage_decimals = Some(decimals);
        self
    }

    /// Set the column names used by the findings view.
    pub fn findings(mut self, findings: FindingsConfig) -> Self {
        self.findings = Some(findings);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `AnalysisConfig` or an error if validation fails.
    pub fn build(self) -> std::result::Result<AnalysisConfig, ConfigValidationError> {
        let defaults = AnalysisConfig::default();
        let config = AnalysisConfig {
            separator: self.separator.unwrap_or(defaults.separator),
            infer_schema_length: self
                .infer_schema_length
                .unwrap_or(defaults.infer_schema_length),
            null_values: self.null_values.unwrap_or(defaults.null_values),
            histogram_bins: self.histogram_bins.unwrap_or(defaults.histogram_bins),
            preview_rows: self.preview_rows.unwrap_or(defaults.preview_rows),
            default_numeric_selection: self
                .default_numeric_selection
                .unwrap_or(defaults.default_numeric_selection),
            default_correlation_selection: self
                .default_correlation_selection
                .unwrap_or(defaults.default_correlation_selection),
            percentage_decimals: self
                .percentage_decimals
                .unwrap_or(defaults.percentage_decimals),
            findings: self.findings.unwrap_or(defaults.findings),
        };

        config.validate()?;
        Ok(config)
    }
}
