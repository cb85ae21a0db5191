//! Dataset loading.
//!
//! Reads a delimited text table (`;` by default) into a polars `DataFrame`
//! and rejects files that parse but are clearly not the expected table:
//! a single column usually means the wrong separator, numeric header names
//! usually mean the header row is missing.

use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::session::Dataset;

/// Loads datasets with the separator and schema settings of a config.
#[derive(Debug, Clone, Copy)]
pub struct DatasetLoader<'a> {
    config: &'a AnalysisConfig,
}

impl<'a> DatasetLoader<'a> {
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self { config }
    }

    /// Load a file from disk.
    ///
    /// Every failure, including I/O errors, is reported as
    /// [`AnalysisError::LoadFailed`].
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<Dataset> {
        let path = path.as_ref();
        let source = path.display().to_string();

        let metadata = std::fs::metadata(path)
            .map_err(|e| self.rejected(&source, format!("cannot read file: {e}")))?;
        if !metadata.is_file() {
            return Err(self.rejected(&source, "not a regular file".to_string()));
        }

        debug!("Parsing '{}' ({} bytes)", source, metadata.len());
        let df = self
            .read_options()
            .try_into_reader_with_file_path(Some(path.into()))
            .and_then(|reader| reader.finish())
            .map_err(|e| self.rejected(&source, e.to_string()))?;

        self.finish(source, metadata.len(), df)
    }

    /// Load a table from an in-memory buffer (an uploaded file).
    pub fn load_bytes(&self, source: &str, bytes: Vec<u8>) -> Result<Dataset> {
        let size_bytes = bytes.len() as u64;
        if bytes.is_empty() {
            return Err(self.rejected(source, "file is empty".to_string()));
        }

        let df = self
            .read_options()
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()
            .map_err(|e| self.rejected(source, e.to_string()))?;

        self.finish(source.to_string(), size_bytes, df)
    }

    fn read_options(&self) -> CsvReadOptions {
        let null_values = (!self.config.null_values.is_empty()).then(|| {
            NullValues::AllColumns(
                self.config
                    .null_values
                    .iter()
                    .map(|v| PlSmallStr::from(v.as_str()))
                    .collect(),
            )
        });

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.config.infer_schema_length)
            .with_parse_options(
                CsvParseOptions::default()
                    .with_separator(self.config.separator)
                    .with_null_values(null_values),
            )
    }

    fn finish(&self, source: String, size_bytes: u64, df: DataFrame) -> Result<Dataset> {
        validate_structure(&df, self.config.separator)
            .map_err(|reason| self.rejected(&source, reason))?;

        let dataset = Dataset::from_dataframe(source, size_bytes, df);
        info!(
            "Loaded '{}': {} rows x {} columns ({} numeric, {} categorical)",
            dataset.info().source,
            dataset.info().row_count,
            dataset.info().column_count,
            dataset.classification().n_numeric(),
            dataset.classification().n_categorical()
        );
        Ok(dataset)
    }

    fn rejected(&self, source: &str, reason: String) -> AnalysisError {
        warn!("Rejected '{}': {}", source, reason);
        AnalysisError::load_failed(source, reason)
    }
}

/// Structural checks on a freshly parsed table.
fn validate_structure(df: &DataFrame, separator: u8) -> std::result::Result<(), String> {
    if df.width() < 2 {
        return Err(format!(
            "found {} column(s); is the file separated by '{}'?",
            df.width(),
            separator as char
        ));
    }

    let numeric_headers: Vec<String> = df
        .get_column_names()
        .into_iter()
        .filter(|name| name.trim().parse::<f64>().is_ok())
        .map(|name| name.to_string())
        .collect();
    if !numeric_headers.is_empty() {
        return Err(format!(
            "header row looks like data (numeric column names: {}); the first line must hold column names",
            numeric_headers.join(", ")
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(content: &str) -> Result<Dataset> {
        let config = AnalysisConfig::default();
        DatasetLoader::new(&config).load_bytes("test.csv", content.as_bytes().to_vec())
    }

    #[test]
    fn test_load_semicolon_table() {
        let dataset = load("age;job;y\n30;admin.;no\n45;technician;yes\n").unwrap();
        assert_eq!(dataset.info().row_count, 2);
        assert_eq!(dataset.info().column_count, 3);
        assert_eq!(dataset.classification().numeric, vec!["age"]);
        assert_eq!(dataset.classification().categorical, vec!["job", "y"]);
    }

    #[test]
    fn test_empty_fields_are_missing() {
        let dataset = load("age;job\n30;\n;admin.\n").unwrap();
        let df = dataset.df();
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(df.column("job").unwrap().null_count(), 1);
    }

    #[test]
    fn test_null_markers_keep_column_numeric() {
        let content = "age;job\n30;admin.\nNA;services\n45;NULL\nNaN;technician\n";
        let dataset = load(content).unwrap();
        assert_eq!(dataset.classification().numeric, vec!["age"]);
        assert_eq!(dataset.classification().categorical, vec!["job"]);

        let df = dataset.df();
        assert_eq!(df.column("age").unwrap().null_count(), 2);
        assert_eq!(df.column("job").unwrap().null_count(), 1);
    }

    #[test]
    fn test_null_markers_can_be_disabled() {
        let config = AnalysisConfig::builder()
            .null_values(Vec::new())
            .build()
            .unwrap();
        let dataset = DatasetLoader::new(&config)
            .load_bytes("test.csv", b"age;job\n30;admin.\nNA;services\n".to_vec())
            .unwrap();
        assert_eq!(dataset.classification().categorical, vec!["age", "job"]);
    }

    #[test]
    fn test_comma_separated_rejected() {
        let err = load("age,job,y\n30,admin.,no\n").unwrap_err();
        assert!(matches!(err, AnalysisError::LoadFailed { .. }));
        assert!(err.to_string().contains("separated"));
    }

    #[test]
    fn test_missing_header_rejected() {
        let err = load("30;admin.;no\n45;technician;yes\n").unwrap_err();
        assert!(matches!(err, AnalysisError::LoadFailed { .. }));
        assert!(err.to_string().contains("header"));
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(matches!(load(""), Err(AnalysisError::LoadFailed { .. })));
    }

    #[test]
    fn test_missing_file_rejected() {
        let config = AnalysisConfig::default();
        let err = DatasetLoader::new(&config)
            .load_path("/definitely/not/here.csv")
            .unwrap_err();
        assert_eq!(err.error_code(), "LOAD_FAILED");
    }

    #[test]
    fn test_custom_separator() {
        let config = AnalysisConfig::builder().separator(b',').build().unwrap();
        let dataset = DatasetLoader::new(&config)
            .load_bytes("comma.csv", b"age,y\n30,no\n".to_vec())
            .unwrap();
        assert_eq!(dataset.info().column_count, 2);
    }
}
