//! Result types shared by the statistics engines, views and reports.
//!
//! Statistics that can be undefined (empty or fully-missing columns, a single
//! value for a standard deviation) are `Option`s; front ends render `None`
//! as "N/A".

use serde::{Deserialize, Serialize};

// ============================================================================
// Dataset Overview
// ============================================================================

/// Per-column entry of the dataset overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnOverview {
    pub name: String,
    /// Polars dtype name ("Int64", "Float64", "String").
    pub dtype: String,
    pub null_count: usize,
}

/// Number of columns sharing a dtype.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeCount {
    pub dtype: String,
    pub count: usize,
}

/// Shape, dtypes and missing counts of the whole dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetOverview {
    pub rows: usize,
    pub columns: usize,
    pub total_cells: usize,
    pub memory_bytes: u64,
    pub column_info: Vec<ColumnOverview>,
    pub total_missing: usize,
    /// Column count per dtype, most common first.
    pub type_distribution: Vec<TypeCount>,
}

/// First rows of a table rendered as strings (`None` for missing cells).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TablePreview {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

// ============================================================================
// Column Summaries
// ============================================================================

/// Descriptive statistics of a numeric column (or of one group of it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub column: String,
    /// Non-missing values.
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    /// Sample standard deviation (divisor n - 1).
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub max: Option<f64>,
}

/// Descriptive statistics of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoricalSummary {
    pub column: String,
    /// Non-missing values.
    pub count: usize,
    pub unique: usize,
    pub mode: Option<String>,
    /// Frequency of the mode, 0 when the column has no values.
    pub mode_frequency: usize,
}

/// Summary of a single column, shaped by the column's kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ColumnSummary {
    Numeric(NumericSummary),
    Categorical(CategoricalSummary),
}

/// Direction suggested by comparing mean and median.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkewDirection {
    /// Mean above median.
    Right,
    /// Mean below median.
    Left,
    Symmetric,
}

/// Derived figures shown next to a numeric summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NumericInsight {
    pub summary: NumericSummary,
    /// `max - min`
    pub range: Option<f64>,
    /// `q3 - q1`
    pub iqr: Option<f64>,
    /// `std / mean * 100`, undefined when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
    pub skew: Option<SkewDirection>,
}

// ============================================================================
// Missing Values & Value Counts
// ============================================================================

/// Missing cells of one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueEntry {
    pub column: String,
    pub missing_count: usize,
    /// Percentage of rows, rounded to the configured decimals.
    pub missing_percentage: f64,
}

/// Missing cells of every column, highest count first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub entries: Vec<MissingValueEntry>,
    pub total_missing: usize,
    pub total_cells: usize,
    pub total_percentage: f64,
}

impl MissingValueReport {
    /// Entries with at least one missing cell.
    pub fn with_missing(&self) -> impl Iterator<Item = &MissingValueEntry> {
        self.entries.iter().filter(|e| e.missing_count > 0)
    }

    pub fn is_complete(&self) -> bool {
        self.total_missing == 0
    }
}

/// Frequency of one distinct value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: usize,
    /// `count / non-missing values`
    pub proportion: f64,
}

/// Frequencies of every distinct value of a column, highest first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValueCounts {
    pub column: String,
    /// Non-missing values counted.
    pub total: usize,
    pub entries: Vec<CategoryCount>,
}

impl ValueCounts {
    pub fn count_of(&self, value: &str) -> Option<usize> {
        self.entries.iter().find(|e| e.value == value).map(|e| e.count)
    }

    pub fn proportion_of(&self, value: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.value == value)
            .map(|e| e.proportion)
    }
}

// ============================================================================
// Bivariate
// ============================================================================

/// Numeric summary of the rows sharing one category value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: String,
    pub summary: NumericSummary,
}

/// A numeric column summarised per value of a categorical column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericByCategory {
    pub numeric_column: String,
    pub categorical_column: String,
    /// Groups ordered by category label.
    pub groups: Vec<GroupSummary>,
    pub highest_mean_group: Option<String>,
    pub lowest_mean_group: Option<String>,
}

/// Two-way frequency table of two categorical columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContingencyTable {
    pub row_column: String,
    pub col_column: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    /// `counts[row][col]`
    pub counts: Vec<Vec<usize>>,
}

/// Contingency table with each row divided by its total, as percentages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProportionTable {
    pub row_column: String,
    pub col_column: String,
    pub row_labels: Vec<String>,
    pub col_labels: Vec<String>,
    pub percentages: Vec<Vec<f64>>,
}

/// Pairwise Pearson correlations of a set of numeric columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// `values[i][j]`; `None` where the coefficient is undefined.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    /// Coefficient of a named pair.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }
}
