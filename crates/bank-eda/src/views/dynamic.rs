//! Dynamic analysis: range filtering, multi-variable comparison and a
//! correlation matrix over a custom selection.

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{pick_numeric_columns, require_kind};
use crate::charts::{self, Chart};
use crate::classifier::ColumnKind;
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result, ResultExt};
use crate::session::Session;
use crate::stats;
use crate::types::{CorrelationMatrix, NumericSummary, TablePreview};
use crate::utils::{numeric_values, percentage};

/// What the dynamic tool should compute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DynamicRequest {
    /// Keep rows whose `column` lies in `[min, max]`; omitted bounds default
    /// to the column's observed minimum and maximum.
    RangeFilter {
        column: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Histograms of several numeric columns side by side.
    Comparison { columns: Vec<String> },
    /// Correlation matrix of the chosen numeric columns.
    Correlation { columns: Vec<String> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeFilterResult {
    pub column: String,
    pub min: f64,
    pub max: f64,
    pub total_rows: usize,
    pub matched_rows: usize,
    pub matched_percentage: f64,
    pub excluded_rows: usize,
    /// First matching rows.
    pub preview: TablePreview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub columns: Vec<String>,
    pub summaries: Vec<NumericSummary>,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationResult {
    pub matrix: CorrelationMatrix,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DynamicView {
    RangeFilter(RangeFilterResult),
    Comparison(ComparisonResult),
    Correlation(CorrelationResult),
}

/// Run one dynamic analysis request.
pub fn dynamic_analysis(
    session: &Session,
    config: &AnalysisConfig,
    request: &DynamicRequest,
) -> Result<DynamicView> {
    match request {
        DynamicRequest::RangeFilter { column, min, max } => {
            range_filter(session, config, column, *min, *max).map(DynamicView::RangeFilter)
        }
        DynamicRequest::Comparison { columns } => {
            comparison(session, config, columns).map(DynamicView::Comparison)
        }
        DynamicRequest::Correlation { columns } => {
            correlation(session, config, columns).map(DynamicView::Correlation)
        }
    }
}

fn range_filter(
    session: &Session,
    config: &AnalysisConfig,
    column: &str,
    min: Option<f64>,
    max: Option<f64>,
) -> Result<RangeFilterResult> {
    let dataset = session.dataset()?;
    require_kind(dataset.classification(), column, ColumnKind::Numeric)?;

    let df = dataset.df();
    let total_rows = df.height();
    let observed = stats::numeric_summary(df, column)?;

    let bounds = min.or(observed.min).zip(max.or(observed.max));
    let Some((lo, hi)) = bounds else {
        // Fully missing column with no explicit bounds: nothing can match.
        return Ok(RangeFilterResult {
            column: column.to_string(),
            min: min.unwrap_or(f64::NAN),
            max: max.unwrap_or(f64::NAN),
            total_rows,
            matched_rows: 0,
            matched_percentage: 0.0,
            excluded_rows: total_rows,
            preview: stats::preview(&df.head(Some(0)), config.preview_rows)?,
        });
    };
    if lo.is_nan() || hi.is_nan() || lo > hi {
        return Err(AnalysisError::InvalidRange { min: lo, max: hi });
    }

    let filtered = df
        .clone()
        .lazy()
        .filter(col(column).gt_eq(lit(lo)).and(col(column).lt_eq(lit(hi))))
        .collect()
        .context(format!("Filtering '{column}' to [{lo}, {hi}]"))?;

    let matched_rows = filtered.height();
    debug!(
        "Range filter on '{}' kept {} of {} rows",
        column, matched_rows, total_rows
    );

    Ok(RangeFilterResult {
        column: column.to_string(),
        min: lo,
        max: hi,
        total_rows,
        matched_rows,
        matched_percentage: percentage(matched_rows, total_rows),
        excluded_rows: total_rows - matched_rows,
        preview: stats::preview(&filtered, config.preview_rows)?,
    })
}

fn comparison(
    session: &Session,
    config: &AnalysisConfig,
    selected: &[String],
) -> Result<ComparisonResult> {
    let dataset = session.dataset()?;
    let columns = pick_numeric_columns(
        dataset.classification(),
        selected,
        config.default_numeric_selection,
    )?;
    if columns.len() < 2 {
        return Err(AnalysisError::InsufficientSelection {
            required: 2,
            selected: columns.len(),
        });
    }

    let mut summaries = Vec::with_capacity(columns.len());
    let mut charts = Vec::with_capacity(columns.len());
    for name in &columns {
        let values: Vec<f64> = numeric_values(dataset.df(), name)?
            .into_iter()
            .flatten()
            .collect();
        summaries.push(stats::summarize_values(name, &values));
        charts.push(Chart::Histogram(charts::histogram_chart(
            name,
            &values,
            config.histogram_bins,
        )));
    }

    Ok(ComparisonResult {
        columns,
        summaries,
        charts,
    })
}

fn correlation(
    session: &Session,
    config: &AnalysisConfig,
    selected: &[String],
) -> Result<CorrelationResult> {
    let dataset = session.dataset()?;
    let columns = pick_numeric_columns(
        dataset.classification(),
        selected,
        config.default_correlation_selection,
    )?;

    let matrix = stats::correlation_matrix(dataset.df(), &columns)?;
    let charts = vec![Chart::Heatmap(charts::correlation_heatmap(&matrix))];
    Ok(CorrelationResult { matrix, charts })
}
