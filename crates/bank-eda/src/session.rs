//! Session state.
//!
//! A [`Session`] owns at most one loaded [`Dataset`]. Views receive the
//! session by reference and go through [`Session::dataset`], which is the
//! single place the "nothing loaded yet" precondition is enforced.
//!
//! A load either replaces the dataset wholesale or leaves the session
//! exactly as it was.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::classifier::ColumnClassification;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::loader::DatasetLoader;

/// Metadata about a loaded table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetInfo {
    /// Path or upload name the table came from.
    pub source: String,
    pub size_bytes: u64,
    pub row_count: usize,
    pub column_count: usize,
}

/// A loaded table together with its column classification.
///
/// Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    info: DatasetInfo,
    classification: ColumnClassification,
}

impl Dataset {
    /// Wrap a parsed table, classifying its columns.
    pub fn from_dataframe(source: impl Into<String>, size_bytes: u64, df: DataFrame) -> Self {
        let info = DatasetInfo {
            source: source.into(),
            size_bytes,
            row_count: df.height(),
            column_count: df.width(),
        };
        let classification = ColumnClassification::classify(&df);
        Self {
            df,
            info,
            classification,
        }
    }

    pub fn df(&self) -> &DataFrame {
        &self.df
    }

    pub fn info(&self) -> &DatasetInfo {
        &self.info
    }

    pub fn classification(&self) -> &ColumnClassification {
        &self.classification
    }
}

/// In-memory analysis session.
#[derive(Debug, Default)]
pub struct Session {
    dataset: Option<Dataset>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// `false` until the first successful load.
    pub fn data_loaded(&self) -> bool {
        self.dataset.is_some()
    }

    /// The loaded dataset, or [`AnalysisError::NoDataLoaded`].
    pub fn dataset(&self) -> Result<&Dataset> {
        self.dataset.as_ref().ok_or(AnalysisError::NoDataLoaded)
    }

    /// Load a file, replacing the current dataset on success.
    pub fn load_file(
        &mut self,
        path: impl AsRef<Path>,
        config: &AnalysisConfig,
    ) -> Result<&DatasetInfo> {
        let dataset = DatasetLoader::new(config).load_path(path)?;
        Ok(self.replace(dataset))
    }

    /// Load an in-memory upload, replacing the current dataset on success.
    pub fn load_bytes(
        &mut self,
        source: &str,
        bytes: Vec<u8>,
        config: &AnalysisConfig,
    ) -> Result<&DatasetInfo> {
        let dataset = DatasetLoader::new(config).load_bytes(source, bytes)?;
        Ok(self.replace(dataset))
    }

    /// Install an already-built dataset.
    pub fn replace(&mut self, dataset: Dataset) -> &DatasetInfo {
        if let Some(previous) = &self.dataset {
            debug!("Replacing dataset '{}'", previous.info.source);
        }
        self.dataset.insert(dataset).info()
    }

    /// Drop the loaded dataset.
    pub fn clear(&mut self) {
        self.dataset = None;
    }
}

static_assertions::assert_impl_all!(Session: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_dataset() -> Dataset {
        let df = df!(
            "age" => [30i64, 45],
            "y" => ["no", "yes"]
        )
        .unwrap();
        Dataset::from_dataframe("memory", 0, df)
    }

    #[test]
    fn test_new_session_has_no_data() {
        let session = Session::new();
        assert!(!session.data_loaded());
        assert!(matches!(session.dataset(), Err(AnalysisError::NoDataLoaded)));
    }

    #[test]
    fn test_replace_installs_dataset() {
        let mut session = Session::new();
        let info = session.replace(sample_dataset()).clone();
        assert_eq!(info.row_count, 2);
        assert_eq!(info.column_count, 2);
        assert!(session.data_loaded());
        assert_eq!(
            session.dataset().unwrap().classification().numeric,
            vec!["age"]
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_dataset() {
        let config = AnalysisConfig::default();
        let mut session = Session::new();
        session.replace(sample_dataset());

        let result = session.load_bytes("broken.csv", b"a,b,c\n1,2,3\n".to_vec(), &config);
        assert!(matches!(result, Err(AnalysisError::LoadFailed { .. })));
        assert!(session.data_loaded());
        assert_eq!(session.dataset().unwrap().info().source, "memory");
    }

    #[test]
    fn test_failed_first_load_leaves_session_empty() {
        let config = AnalysisConfig::default();
        let mut session = Session::new();
        assert!(session.load_bytes("empty.csv", Vec::new(), &config).is_err());
        assert!(!session.data_loaded());
    }

    #[test]
    fn test_clear() {
        let mut session = Session::new();
        session.replace(sample_dataset());
        session.clear();
        assert!(!session.data_loaded());
    }
}
