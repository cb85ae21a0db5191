//! Univariate statistics: dataset overview, column summaries, missing values
//! and value counts.

use polars::prelude::*;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::types::{
    CategoricalSummary, CategoryCount, ColumnOverview, ColumnSummary, DatasetOverview,
    MissingValueEntry, MissingValueReport, NumericInsight, NumericSummary, SkewDirection,
    TablePreview, TypeCount, ValueCounts,
};
use crate::utils::{
    column, dtype_name, frequencies, is_numeric_dtype, mean, mode_sorted, numeric_values,
    percentage, quantile_sorted, round_to, sample_std, sorted_floats, string_mode, string_values,
};

// ============================================================================
// Overview
// ============================================================================

/// Shape, dtypes, memory and missing counts of a table.
pub fn overview(df: &DataFrame) -> DatasetOverview {
    let column_info: Vec<ColumnOverview> = df
        .get_columns()
        .iter()
        .map(|col| ColumnOverview {
            name: col.name().to_string(),
            dtype: dtype_name(col.dtype()),
            null_count: col.null_count(),
        })
        .collect();

    let total_missing = column_info.iter().map(|c| c.null_count).sum();
    let type_distribution = frequencies(column_info.iter().map(|c| c.dtype.as_str()))
        .into_iter()
        .map(|(dtype, count)| TypeCount { dtype, count })
        .collect();

    DatasetOverview {
        rows: df.height(),
        columns: df.width(),
        total_cells: df.height().saturating_mul(df.width()),
        memory_bytes: df.estimated_size() as u64,
        column_info,
        total_missing,
        type_distribution,
    }
}

/// First `rows` rows of the table as strings.
pub fn preview(df: &DataFrame, rows: usize) -> Result<TablePreview> {
    let head = df.head(Some(rows));
    let columns: Vec<String> = head
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();

    let mut cells: Vec<Vec<Option<String>>> = Vec::with_capacity(columns.len());
    for name in &columns {
        cells.push(string_values(&head, name)?);
    }

    let rows = (0..head.height())
        .map(|row| cells.iter().map(|col| col[row].clone()).collect())
        .collect();

    Ok(TablePreview { columns, rows })
}

// ============================================================================
// Column Summaries
// ============================================================================

/// Summarise a column according to its dtype.
pub fn summarize_column(df: &DataFrame, name: &str) -> Result<ColumnSummary> {
    let col = column(df, name)?;
    if is_numeric_dtype(col.dtype()) {
        numeric_summary(df, name).map(ColumnSummary::Numeric)
    } else {
        categorical_summary(df, name).map(ColumnSummary::Categorical)
    }
}

/// Descriptive statistics of a numeric column, ignoring missing values.
pub fn numeric_summary(df: &DataFrame, name: &str) -> Result<NumericSummary> {
    let values: Vec<f64> = numeric_values(df, name)?.into_iter().flatten().collect();
    Ok(summarize_values(name, &values))
}

/// Descriptive statistics of a set of present values.
///
/// Every statistic is `None` for an empty slice; `std` also for a single value.
pub fn summarize_values(name: &str, values: &[f64]) -> NumericSummary {
    let sorted = sorted_floats(values);
    NumericSummary {
        column: name.to_string(),
        count: sorted.len(),
        mean: mean(&sorted),
        median: quantile_sorted(&sorted, 0.5),
        mode: mode_sorted(&sorted).map(|(value, _)| value),
        std: sample_std(&sorted),
        min: sorted.first().copied(),
        q1: quantile_sorted(&sorted, 0.25),
        q3: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Distinct count and most frequent value of a column.
pub fn categorical_summary(df: &DataFrame, name: &str) -> Result<CategoricalSummary> {
    let values = string_values(df, name)?;
    let counts = frequencies(values.iter().flatten().map(String::as_str));
    let count = counts.iter().map(|(_, n)| n).sum();
    let mode = string_mode(&counts);

    Ok(CategoricalSummary {
        column: name.to_string(),
        count,
        unique: counts.len(),
        mode_frequency: mode.as_ref().map_or(0, |(_, n)| *n),
        mode: mode.map(|(value, _)| value),
    })
}

/// Numeric summaries for the given columns, in the given order.
pub fn describe(df: &DataFrame, columns: &[String]) -> Result<Vec<NumericSummary>> {
    debug!("Describing {} numeric columns", columns.len());
    columns
        .iter()
        .map(|name| numeric_summary(df, name))
        .collect()
}

/// Spread and shape figures derived from a numeric summary.
pub fn numeric_insight(summary: NumericSummary) -> NumericInsight {
    let range = summary.max.zip(summary.min).map(|(max, min)| max - min);
    let iqr = summary.q3.zip(summary.q1).map(|(q3, q1)| q3 - q1);
    let coefficient_of_variation = summary
        .std
        .zip(summary.mean)
        .filter(|(_, mean)| *mean != 0.0)
        .map(|(std, mean)| std / mean * 100.0);
    let skew = summary.mean.zip(summary.median).map(|(mean, median)| {
        if mean > median {
            SkewDirection::Right
        } else if mean < median {
            SkewDirection::Left
        } else {
            SkewDirection::Symmetric
        }
    });

    NumericInsight {
        summary,
        range,
        iqr,
        coefficient_of_variation,
        skew,
    }
}

// ============================================================================
// Missing Values
// ============================================================================

/// Missing-cell counts per column, highest first (ties keep column order).
pub fn missing_value_report(df: &DataFrame, decimals: u32) -> MissingValueReport {
    let rows = df.height();
    let mut entries: Vec<MissingValueEntry> = df
        .get_columns()
        .iter()
        .map(|col| {
            let missing_count = col.null_count();
            MissingValueEntry {
                column: col.name().to_string(),
                missing_count,
                missing_percentage: round_to(percentage(missing_count, rows), decimals),
            }
        })
        .collect();
    entries.sort_by(|a, b| b.missing_count.cmp(&a.missing_count));

    let total_missing = entries.iter().map(|e| e.missing_count).sum();
    let total_cells = rows.saturating_mul(df.width());

    MissingValueReport {
        entries,
        total_missing,
        total_cells,
        total_percentage: round_to(percentage(total_missing, total_cells), decimals),
    }
}

// ============================================================================
// Value Counts
// ============================================================================

/// Frequency of every distinct non-missing value, highest first.
pub fn value_counts(df: &DataFrame, name: &str) -> Result<ValueCounts> {
    let values = string_values(df, name)?;
    let counts = frequencies(values.iter().flatten().map(String::as_str));
    let total: usize = counts.iter().map(|(_, n)| n).sum();

    let entries = counts
        .into_iter()
        .map(|(value, count)| CategoryCount {
            value,
            proportion: count as f64 / total as f64,
            count,
        })
        .collect();

    Ok(ValueCounts {
        column: name.to_string(),
        total,
        entries,
    })
}

/// Value counts restricted to categorical columns.
pub fn categorical_value_counts(df: &DataFrame, name: &str) -> Result<ValueCounts> {
    if is_numeric_dtype(column(df, name)?.dtype()) {
        return Err(AnalysisError::NotCategorical(name.to_string()));
    }
    value_counts(df, name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_df() -> DataFrame {
        df!(
            "age" => [Some(25i64), Some(30), Some(35), Some(40), None],
            "job" => [Some("admin."), Some("technician"), Some("admin."), None, Some("services")],
            "y" => ["no", "no", "yes", "no", "yes"]
        )
        .unwrap()
    }

    #[test]
    fn test_overview_counts() {
        let overview = overview(&sample_df());
        assert_eq!(overview.rows, 5);
        assert_eq!(overview.columns, 3);
        assert_eq!(overview.total_cells, 15);
        assert_eq!(overview.total_missing, 2);
        assert_eq!(overview.column_info[0].dtype, "Int64");
        assert_eq!(overview.type_distribution[0].dtype, "String");
        assert_eq!(overview.type_distribution[0].count, 2);
    }

    #[test]
    fn test_overview_empty_dataframe() {
        let overview = overview(&DataFrame::empty());
        assert_eq!(overview.rows, 0);
        assert_eq!(overview.total_cells, 0);
        assert!(overview.type_distribution.is_empty());
    }

    #[test]
    fn test_numeric_summary_ignores_missing() {
        let summary = numeric_summary(&sample_df(), "age").unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.mean, Some(32.5));
        assert_eq!(summary.median, Some(32.5));
        assert_eq!(summary.q1, Some(28.75));
        assert_eq!(summary.q3, Some(36.25));
        assert_eq!(summary.min, Some(25.0));
        assert_eq!(summary.max, Some(40.0));
        assert_eq!(summary.mode, Some(25.0));
    }

    #[test]
    fn test_numeric_summary_all_missing() {
        let df = df!("balance" => [None::<f64>, None]).unwrap();
        let summary = numeric_summary(&df, "balance").unwrap();
        assert_eq!(summary.count, 0);
        assert_eq!(summary.mean, None);
        assert_eq!(summary.median, None);
        assert_eq!(summary.mode, None);
        assert_eq!(summary.std, None);
    }

    #[test]
    fn test_numeric_summary_skips_nan() {
        let df = df!("duration" => [100.0f64, f64::NAN, 300.0]).unwrap();
        let summary = numeric_summary(&df, "duration").unwrap();
        assert_eq!(summary.count, 2);
        assert_eq!(summary.mean, Some(200.0));
        assert_eq!(summary.max, Some(300.0));
    }

    #[test]
    fn test_single_value_has_no_std() {
        let summary = summarize_values("x", &[7.0]);
        assert_eq!(summary.mean, Some(7.0));
        assert_eq!(summary.std, None);
    }

    #[test]
    fn test_summarize_column_dispatches_by_dtype() {
        let df = sample_df();
        assert!(matches!(
            summarize_column(&df, "age").unwrap(),
            ColumnSummary::Numeric(_)
        ));
        match summarize_column(&df, "job").unwrap() {
            ColumnSummary::Categorical(summary) => {
                assert_eq!(summary.count, 4);
                assert_eq!(summary.unique, 3);
                assert_eq!(summary.mode.as_deref(), Some("admin."));
                assert_eq!(summary.mode_frequency, 2);
            }
            other => panic!("expected categorical summary, got {other:?}"),
        }
    }

    #[test]
    fn test_describe_rejects_categorical() {
        let err = describe(&sample_df(), &["age".to_string(), "job".to_string()]).unwrap_err();
        assert!(matches!(err, AnalysisError::NotNumeric(_)));
    }

    #[test]
    fn test_numeric_insight() {
        let insight = numeric_insight(summarize_values("x", &[1.0, 2.0, 3.0, 10.0]));
        assert_eq!(insight.range, Some(9.0));
        assert_eq!(insight.skew, Some(SkewDirection::Right));
        assert!(insight.coefficient_of_variation.is_some());

        let zero_mean = numeric_insight(summarize_values("z", &[-1.0, 1.0]));
        assert_eq!(zero_mean.coefficient_of_variation, None);
        assert_eq!(zero_mean.skew, Some(SkewDirection::Symmetric));
    }

    #[test]
    fn test_missing_value_report() {
        let df = df!(
            "a" => [Some(1i64), None, None],
            "b" => [Some("x"), Some("y"), None],
            "c" => [1i64, 2, 3]
        )
        .unwrap();
        let report = missing_value_report(&df, 2);

        assert_eq!(report.entries[0].column, "a");
        assert_eq!(report.entries[0].missing_count, 2);
        assert_eq!(report.entries[0].missing_percentage, 66.67);
        assert_eq!(report.entries[1].missing_percentage, 33.33);
        assert_eq!(report.entries[2].missing_count, 0);
        assert_eq!(report.total_missing, 3);
        assert_eq!(report.total_cells, 9);
        assert_eq!(report.with_missing().count(), 2);
    }

    #[test]
    fn test_missing_value_report_no_rows() {
        let df = df!("a" => Vec::<i64>::new()).unwrap();
        let report = missing_value_report(&df, 2);
        assert_eq!(report.entries[0].missing_percentage, 0.0);
        assert!(report.is_complete());
    }

    #[test]
    fn test_value_counts_job_scenario() {
        let df = df!("job" => ["admin.", "admin.", "technician"]).unwrap();
        let counts = value_counts(&df, "job").unwrap();
        assert_eq!(counts.entries[0].value, "admin.");
        assert_eq!(counts.entries[0].count, 2);
        assert!((counts.entries[0].proportion - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(counts.entries[1].value, "technician");
        assert!((counts.entries[1].proportion - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_value_counts_proportions_sum_to_one() {
        let counts = value_counts(&sample_df(), "job").unwrap();
        let sum: f64 = counts.entries.iter().map(|e| e.proportion).sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert_eq!(counts.total, 4);
    }

    #[test]
    fn test_categorical_value_counts_rejects_numeric() {
        assert!(matches!(
            categorical_value_counts(&sample_df(), "age"),
            Err(AnalysisError::NotCategorical(_))
        ));
    }

    #[test]
    fn test_preview_limits_rows() {
        let preview = preview(&sample_df(), 2).unwrap();
        assert_eq!(preview.columns, vec!["age", "job", "y"]);
        assert_eq!(preview.rows.len(), 2);
        assert_eq!(preview.rows[0][0].as_deref(), Some("25"));
        assert_eq!(preview.rows[1][1].as_deref(), Some("technician"));
    }
}
