//! Pearson correlation over a selected set of numeric columns.

use anofox_statistics::correlation::pearson as stats_pearson;
use polars::prelude::*;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::types::CorrelationMatrix;
use crate::utils::numeric_values;

/// Pairwise-complete Pearson correlation matrix of `columns`.
///
/// The matrix is symmetric with 1.0 on the diagonal. A pair with fewer than
/// two complete rows, or with a constant side, has no coefficient.
pub fn correlation_matrix(df: &DataFrame, columns: &[String]) -> Result<CorrelationMatrix> {
    if columns.len() < 2 {
        return Err(AnalysisError::InsufficientSelection {
            required: 2,
            selected: columns.len(),
        });
    }

    let series_values = columns
        .iter()
        .map(|name| numeric_values(df, name))
        .collect::<Result<Vec<_>>>()?;

    let size = columns.len();
    let mut values = vec![vec![None; size]; size];
    for i in 0..size {
        values[i][i] = Some(1.0);
        for j in (i + 1)..size {
            let (x, y): (Vec<f64>, Vec<f64>) = series_values[i]
                .iter()
                .zip(&series_values[j])
                .filter_map(|(&a, &b)| a.zip(b))
                .unzip();

            let estimate = pearson(&x, &y);
            values[i][j] = estimate;
            values[j][i] = estimate;
        }
    }

    debug!("Computed {}x{} correlation matrix", size, size);
    Ok(CorrelationMatrix {
        columns: columns.to_vec(),
        values,
    })
}

/// Pearson coefficient of two equally long samples, clamped to [-1, 1].
///
/// `None` for fewer than two pairs, a constant side, or when the estimate
/// cannot be computed.
pub fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len().min(y.len());
    if n < 2 || is_constant(&x[..n]) || is_constant(&y[..n]) {
        return None;
    }

    stats_pearson(&x[..n], &y[..n], None)
        .ok()
        .map(|result| result.estimate)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
}

fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            "age" => [Some(25.0f64), Some(35.0), Some(45.0), Some(55.0), None],
            "duration" => [Some(100.0f64), Some(210.0), Some(290.0), Some(405.0), Some(50.0)],
            "campaign" => [4i64, 3, 2, 1, 7],
            "constant" => [1i64, 1, 1, 1, 1],
            "job" => ["a", "b", "c", "d", "e"]
        )
        .unwrap()
    }

    fn names(columns: &[&str]) -> Vec<String> {
        columns.iter().map(|c| c.to_string()).collect()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let value = actual.expect("coefficient should be defined");
        assert!((value - expected).abs() < 1e-9, "{value} != {expected}");
    }

    #[test]
    fn test_perfect_correlations() {
        assert_close(pearson(&[1.0, 2.0, 3.0, 4.0], &[2.0, 4.0, 6.0, 8.0]), 1.0);
        assert_close(pearson(&[1.0, 2.0, 3.0, 4.0], &[4.0, 3.0, 2.0, 1.0]), -1.0);
    }

    #[test]
    fn test_partial_correlation() {
        // Sums of cross products and squares: 1.75, 5 and 2.1875.
        let r = pearson(&[1.0, 2.0, 3.0, 4.0], &[1.0, 3.0, 2.0, 2.5]).unwrap();
        assert!((r - 1.75 / (5.0f64 * 2.1875).sqrt()).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_undefined() {
        assert_eq!(pearson(&[1.0], &[2.0]), None);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_matrix_symmetric_with_unit_diagonal() {
        let matrix =
            correlation_matrix(&sample_df(), &names(&["age", "duration", "campaign"])).unwrap();
        for i in 0..3 {
            assert_eq!(matrix.values[i][i], Some(1.0));
            for j in 0..3 {
                assert_eq!(matrix.values[i][j], matrix.values[j][i]);
                if let Some(r) = matrix.values[i][j] {
                    assert!((-1.0..=1.0).contains(&r));
                }
            }
        }
        // Age and campaign move in opposite directions on complete rows.
        assert_close(matrix.get("age", "campaign"), -1.0);
        assert!(matrix.get("age", "duration").unwrap() > 0.99);
    }

    #[test]
    fn test_constant_column_has_no_coefficient() {
        let matrix = correlation_matrix(&sample_df(), &names(&["age", "constant"])).unwrap();
        assert_eq!(matrix.get("age", "constant"), None);
        assert_eq!(matrix.get("constant", "constant"), Some(1.0));
    }

    #[test]
    fn test_insufficient_selection() {
        let err = correlation_matrix(&sample_df(), &names(&["age"])).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::InsufficientSelection {
                required: 2,
                selected: 1
            }
        ));
    }

    #[test]
    fn test_categorical_column_rejected() {
        let err = correlation_matrix(&sample_df(), &names(&["age", "job"])).unwrap_err();
        assert!(matches!(err, AnalysisError::NotNumeric(ref c) if c == "job"));
    }
}
