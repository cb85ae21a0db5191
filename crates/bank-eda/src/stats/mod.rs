//! Statistics engines.
//!
//! - [`descriptive`]: overview, column summaries, missing values, value counts
//! - [`bivariate`]: numeric-by-category summaries and contingency tables
//! - [`correlation`]: Pearson correlation matrices
//!
//! Every function reads a `DataFrame` and returns an owned result; nothing
//! is cached between calls.

pub mod bivariate;
pub mod correlation;
pub mod descriptive;

pub use bivariate::{crosstab, numeric_by_category};
pub use correlation::{correlation_matrix, pearson};
pub use descriptive::{
    categorical_summary, categorical_value_counts, describe, missing_value_report,
    numeric_insight, numeric_summary, overview, preview, summarize_column, summarize_values,
    value_counts,
};
