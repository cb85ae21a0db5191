//! Column classification into numeric and categorical variables.
//!
//! The split is decided by the dtype polars inferred at load time:
//! integer and float columns are numeric, everything else (strings,
//! booleans, dates) is categorical. Every column lands in exactly one set.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::is_numeric_dtype;

/// Kind of a dataset column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// Partition of a dataset's columns, both lists in dataset column order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    /// Classify every column of `df`.
    pub fn classify(df: &DataFrame) -> Self {
        let mut classification = Self::default();

        for col in df.get_columns() {
            let name = col.name().to_string();
            if is_numeric_dtype(col.dtype()) {
                classification.numeric.push(name);
            } else {
                classification.categorical.push(name);
            }
        }

        debug!(
            "Classified {} numeric and {} categorical columns",
            classification.numeric.len(),
            classification.categorical.len()
        );
        classification
    }

    pub fn n_numeric(&self) -> usize {
        self.numeric.len()
    }

    pub fn n_categorical(&self) -> usize {
        self.categorical.len()
    }

    pub fn total(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    /// Kind of the named column, `None` if the dataset has no such column.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        if self.numeric.iter().any(|c| c == name) {
            Some(ColumnKind::Numeric)
        } else if self.categorical.iter().any(|c| c == name) {
            Some(ColumnKind::Categorical)
        } else {
            None
        }
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.kind_of(name) == Some(ColumnKind::Numeric)
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.kind_of(name) == Some(ColumnKind::Categorical)
    }

    /// First `n` numeric columns, the default selection of several views.
    pub fn leading_numeric(&self, n: usize) -> Vec<String> {
        self.numeric.iter().take(n).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn sample_df() -> DataFrame {
        df!(
            "age" => [25i64, 30, 35, 40],
            "y" => ["yes", "no", "yes", "no"],
            "euribor3m" => [4.857f64, 4.961, 1.313, 0.884],
            "default" => [true, false, false, true]
        )
        .unwrap()
    }

    #[test]
    fn test_classify_by_dtype() {
        let classification = ColumnClassification::classify(&sample_df());
        assert_eq!(classification.numeric, vec!["age", "euribor3m"]);
        assert_eq!(classification.categorical, vec!["y", "default"]);
        assert_eq!(classification.n_numeric(), 2);
        assert_eq!(classification.n_categorical(), 2);
    }

    #[test]
    fn test_partition_is_disjoint_and_exhaustive() {
        let df = sample_df();
        let classification = ColumnClassification::classify(&df);

        let numeric: HashSet<_> = classification.numeric.iter().collect();
        let categorical: HashSet<_> = classification.categorical.iter().collect();
        assert!(numeric.is_disjoint(&categorical));

        let all: HashSet<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        let union: HashSet<String> = numeric.union(&categorical).map(|s| s.to_string()).collect();
        assert_eq!(union, all);
        assert_eq!(classification.total(), df.width());
    }

    #[test]
    fn test_kind_of() {
        let classification = ColumnClassification::classify(&sample_df());
        assert_eq!(classification.kind_of("age"), Some(ColumnKind::Numeric));
        assert_eq!(classification.kind_of("y"), Some(ColumnKind::Categorical));
        assert_eq!(classification.kind_of("nope"), None);
        assert!(classification.is_numeric("euribor3m"));
        assert!(classification.is_categorical("default"));
    }

    #[test]
    fn test_empty_dataframe() {
        let classification = ColumnClassification::classify(&DataFrame::empty());
        assert_eq!(classification.total(), 0);
        assert!(classification.leading_numeric(3).is_empty());
    }
}
