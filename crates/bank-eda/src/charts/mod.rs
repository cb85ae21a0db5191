//! Chart preparation.
//!
//! Turns statistics into drawable series. Nothing here draws pixels; a
//! [`ChartRenderer`] does, and [`TextRenderer`] is the built-in one.

mod render;

pub use render::{ChartRenderer, TextRenderer, format_value};

use serde::{Deserialize, Serialize};

use crate::types::{
    ContingencyTable, CorrelationMatrix, MissingValueReport, NumericByCategory, ProportionTable,
    TypeCount, ValueCounts,
};
use crate::utils::{mean, quantile_sorted, sorted_floats};

// ============================================================================
// Chart Types
// ============================================================================

/// One histogram bin, `[start, end)` except the last which includes `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Histogram of a numeric column with mean and median markers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistogramChart {
    pub title: String,
    pub column: String,
    pub bins: Vec<HistogramBin>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bars: Vec<Bar>,
    pub horizontal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PieSlice {
    pub label: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PieChart {
    pub title: String,
    pub slices: Vec<PieSlice>,
}

/// Five-number summary of one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxPlotSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxPlotGroup {
    pub label: String,
    pub count: usize,
    pub summary: BoxPlotSummary,
}

/// One box per category value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxPlotChart {
    pub title: String,
    pub value_column: String,
    pub group_column: String,
    pub groups: Vec<BoxPlotGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapChart {
    pub title: String,
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    /// `values[y][x]`
    pub values: Vec<Vec<Option<f64>>>,
}

/// Any chart a view can hand to a renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Chart {
    Histogram(HistogramChart),
    Bar(BarChart),
    Pie(PieChart),
    BoxPlot(BoxPlotChart),
    Heatmap(HeatmapChart),
}

impl Chart {
    pub fn title(&self) -> &str {
        match self {
            Chart::Histogram(c) => &c.title,
            Chart::Bar(c) => &c.title,
            Chart::Pie(c) => &c.title,
            Chart::BoxPlot(c) => &c.title,
            Chart::Heatmap(c) => &c.title,
        }
    }
}

// ============================================================================
// Builders
// ============================================================================

/// Equal-width bins over `[min, max]` of an ascending slice.
///
/// A constant sample collapses to a single bin.
pub fn build_histogram(sorted: &[f64], bins: usize) -> Vec<HistogramBin> {
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Vec::new();
    };
    if (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min,
            end: max,
            count: sorted.len(),
        }];
    }

    let bin_count = bins.max(1);
    let width = (max - min) / bin_count as f64;
    let mut counts = vec![0usize; bin_count];

    for value in sorted {
        let index = (((value - min) / width) as usize).min(bin_count - 1);
        counts[index] += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(idx, count)| HistogramBin {
            start: min + idx as f64 * width,
            end: if idx + 1 == bin_count {
                max
            } else {
                min + (idx as f64 + 1.0) * width
            },
            count,
        })
        .collect()
}

/// Histogram of present values with mean and median markers.
pub fn histogram_chart(column: &str, values: &[f64], bins: usize) -> HistogramChart {
    let sorted = sorted_floats(values);
    HistogramChart {
        title: format!("Distribution of {column}"),
        column: column.to_string(),
        bins: build_histogram(&sorted, bins),
        mean: mean(&sorted),
        median: quantile_sorted(&sorted, 0.5),
    }
}

/// Frequency bars, or percentage bars when `as_percentage` is set.
pub fn value_counts_bar(counts: &ValueCounts, as_percentage: bool) -> BarChart {
    let bars = counts
        .entries
        .iter()
        .map(|e| Bar {
            label: e.value.clone(),
            value: if as_percentage {
                e.proportion * 100.0
            } else {
                e.count as f64
            },
        })
        .collect();

    BarChart {
        title: format!("Frequency of {}", counts.column),
        x_label: counts.column.clone(),
        y_label: if as_percentage { "Percentage" } else { "Count" }.to_string(),
        bars,
        horizontal: false,
    }
}

pub fn value_counts_pie(counts: &ValueCounts) -> PieChart {
    PieChart {
        title: format!("Share of {}", counts.column),
        slices: counts
            .entries
            .iter()
            .map(|e| PieSlice {
                label: e.value.clone(),
                count: e.count,
                percentage: e.proportion * 100.0,
            })
            .collect(),
    }
}

/// Columns per dtype.
pub fn type_distribution_bar(types: &[TypeCount]) -> BarChart {
    BarChart {
        title: "Columns by data type".to_string(),
        x_label: "Data type".to_string(),
        y_label: "Columns".to_string(),
        bars: types
            .iter()
            .map(|t| Bar {
                label: t.dtype.clone(),
                value: t.count as f64,
            })
            .collect(),
        horizontal: false,
    }
}

/// Numeric vs categorical column counts.
pub fn classification_bar(n_numeric: usize, n_categorical: usize) -> BarChart {
    BarChart {
        title: "Variables by kind".to_string(),
        x_label: "Kind".to_string(),
        y_label: "Columns".to_string(),
        bars: vec![
            Bar {
                label: "Numeric".to_string(),
                value: n_numeric as f64,
            },
            Bar {
                label: "Categorical".to_string(),
                value: n_categorical as f64,
            },
        ],
        horizontal: false,
    }
}

/// Horizontal bars of missing percentage, only for columns with missing cells.
pub fn missing_values_bar(report: &MissingValueReport) -> BarChart {
    BarChart {
        title: "Missing values by column".to_string(),
        x_label: "Missing (%)".to_string(),
        y_label: "Column".to_string(),
        bars: report
            .with_missing()
            .map(|e| Bar {
                label: e.column.clone(),
                value: e.missing_percentage,
            })
            .collect(),
        horizontal: true,
    }
}

/// One box per group; groups without values are left out.
pub fn box_plot(grouped: &NumericByCategory) -> BoxPlotChart {
    let groups = grouped
        .groups
        .iter()
        .filter_map(|g| {
            let s = &g.summary;
            Some(BoxPlotGroup {
                label: g.group.clone(),
                count: s.count,
                summary: BoxPlotSummary {
                    min: s.min?,
                    q1: s.q1?,
                    median: s.median?,
                    q3: s.q3?,
                    max: s.max?,
                },
            })
        })
        .collect();

    BoxPlotChart {
        title: format!(
            "{} by {}",
            grouped.numeric_column, grouped.categorical_column
        ),
        value_column: grouped.numeric_column.clone(),
        group_column: grouped.categorical_column.clone(),
        groups,
    }
}

pub fn crosstab_heatmap(table: &ContingencyTable) -> HeatmapChart {
    HeatmapChart {
        title: format!("{} vs {}", table.row_column, table.col_column),
        x_labels: table.col_labels.clone(),
        y_labels: table.row_labels.clone(),
        values: table
            .counts
            .iter()
            .map(|row| row.iter().map(|&c| Some(c as f64)).collect())
            .collect(),
    }
}

pub fn proportion_heatmap(table: &ProportionTable) -> HeatmapChart {
    HeatmapChart {
        title: format!("{} vs {} (row %)", table.row_column, table.col_column),
        x_labels: table.col_labels.clone(),
        y_labels: table.row_labels.clone(),
        values: table
            .percentages
            .iter()
            .map(|row| row.iter().map(|&p| Some(p)).collect())
            .collect(),
    }
}

pub fn correlation_heatmap(matrix: &CorrelationMatrix) -> HeatmapChart {
    HeatmapChart {
        title: "Correlation matrix".to_string(),
        x_labels: matrix.columns.clone(),
        y_labels: matrix.columns.clone(),
        values: matrix.values.clone(),
    }
}
