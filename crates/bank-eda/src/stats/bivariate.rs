//! Relationships between two variables: a numeric column summarised per
//! category, and two-way frequency tables of categorical columns.

use polars::prelude::*;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::stats::descriptive::summarize_values;
use crate::types::{ContingencyTable, GroupSummary, NumericByCategory, ProportionTable};
use crate::utils::{numeric_values, percentage, string_values};

/// Summarise `numeric_column` for every non-missing value of `categorical_column`.
///
/// Rows with a missing category are dropped; rows with a missing numeric
/// value still form their group but do not enter its statistics.
pub fn numeric_by_category(
    df: &DataFrame,
    numeric_column: &str,
    categorical_column: &str,
) -> Result<NumericByCategory> {
    let numbers = numeric_values(df, numeric_column)?;
    let categories = string_values(df, categorical_column)?;

    let mut grouped: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (category, number) in categories.into_iter().zip(numbers) {
        let Some(category) = category else {
            continue;
        };
        let group = grouped.entry(category).or_default();
        if let Some(number) = number {
            group.push(number);
        }
    }

    let groups: Vec<GroupSummary> = grouped
        .into_iter()
        .map(|(group, values)| GroupSummary {
            summary: summarize_values(numeric_column, &values),
            group,
        })
        .collect();

    let mut highest: Option<(&str, f64)> = None;
    let mut lowest: Option<(&str, f64)> = None;
    for group in &groups {
        let Some(mean) = group.summary.mean else {
            continue;
        };
        if highest.is_none_or(|(_, best)| mean > best) {
            highest = Some((&group.group, mean));
        }
        if lowest.is_none_or(|(_, best)| mean < best) {
            lowest = Some((&group.group, mean));
        }
    }
    let highest_mean_group = highest.map(|(name, _)| name.to_string());
    let lowest_mean_group = lowest.map(|(name, _)| name.to_string());

    debug!(
        "Grouped '{}' by '{}' into {} groups",
        numeric_column,
        categorical_column,
        groups.len()
    );

    Ok(NumericByCategory {
        numeric_column: numeric_column.to_string(),
        categorical_column: categorical_column.to_string(),
        groups,
        highest_mean_group,
        lowest_mean_group,
    })
}

/// Two-way frequency table of `row_column` against `col_column`.
///
/// Labels are the sorted distinct values seen in rows where both columns are
/// present; every label pair has a cell.
pub fn crosstab(df: &DataFrame, row_column: &str, col_column: &str) -> Result<ContingencyTable> {
    if row_column == col_column {
        return Err(AnalysisError::DuplicateSelection(row_column.to_string()));
    }

    let rows = string_values(df, row_column)?;
    let cols = string_values(df, col_column)?;

    let pairs: Vec<(String, String)> = rows
        .into_iter()
        .zip(cols)
        .filter_map(|(row, col)| row.zip(col))
        .collect();

    let row_labels: Vec<String> = pairs
        .iter()
        .map(|(row, _)| row.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let col_labels: Vec<String> = pairs
        .iter()
        .map(|(_, col)| col.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut counts = vec![vec![0usize; col_labels.len()]; row_labels.len()];
    for (row, col) in &pairs {
        // Labels were built from these pairs, so both lookups succeed.
        if let (Ok(i), Ok(j)) = (row_labels.binary_search(row), col_labels.binary_search(col)) {
            counts[i][j] += 1;
        }
    }

    Ok(ContingencyTable {
        row_column: row_column.to_string(),
        col_column: col_column.to_string(),
        row_labels,
        col_labels,
        counts,
    })
}

impl ContingencyTable {
    /// Sum of every cell.
    pub fn grand_total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn row_totals(&self) -> Vec<usize> {
        self.counts.iter().map(|row| row.iter().sum()).collect()
    }

    pub fn col_totals(&self) -> Vec<usize> {
        (0..self.col_labels.len())
            .map(|j| self.counts.iter().map(|row| row[j]).sum())
            .collect()
    }

    /// Each cell as a percentage of its row total (0 for an empty row).
    pub fn row_normalized(&self) -> ProportionTable {
        let percentages = self
            .counts
            .iter()
            .map(|row| {
                let total: usize = row.iter().sum();
                row.iter().map(|&cell| percentage(cell, total)).collect()
            })
            .collect();

        ProportionTable {
            row_column: self.row_column.clone(),
            col_column: self.col_column.clone(),
            row_labels: self.row_labels.clone(),
            col_labels: self.col_labels.clone(),
            percentages,
        }
    }
}
