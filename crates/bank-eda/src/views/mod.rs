//! Dashboard views.
//!
//! One function per view. Each takes the session by reference, checks that a
//! dataset is loaded, validates the caller's selection against the column
//! classification and returns a serializable result with its charts.
//!
//! Selections are optional; an omitted selection falls back to the same
//! default the dashboard offers (first columns of the matching kind).

mod dynamic;
mod findings;

pub use dynamic::{
    ComparisonResult, CorrelationResult, DynamicRequest, DynamicView, RangeFilterResult,
    dynamic_analysis,
};
pub use findings::{Findings, RateEntry, findings};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::{self, Chart};
use crate::classifier::{ColumnClassification, ColumnKind};
use crate::config::AnalysisConfig;
use crate::error::{AnalysisError, Result};
use crate::session::{DatasetInfo, Session};
use crate::stats;
use crate::types::{
    ContingencyTable, DatasetOverview, MissingValueReport, NumericByCategory, NumericInsight,
    NumericSummary, ProportionTable, TablePreview, ValueCounts,
};
use crate::utils::numeric_values;

// ============================================================================
// View Results
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralInfoView {
    pub info: DatasetInfo,
    pub overview: DatasetOverview,
    pub preview: TablePreview,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassificationView {
    pub classification: ColumnClassification,
    pub n_numeric: usize,
    pub n_categorical: usize,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescriptiveView {
    /// One summary per numeric column.
    pub table: Vec<NumericSummary>,
    /// Detail for the selected column, absent when there are no numeric columns.
    pub insight: Option<NumericInsight>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingValuesView {
    pub report: MissingValueReport,
    /// Empty when no cell is missing.
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericDistributionView {
    pub columns: Vec<String>,
    pub summaries: Vec<NumericSummary>,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalDistributionView {
    pub counts: ValueCounts,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericVsCategoricalView {
    pub grouped: NumericByCategory,
    pub charts: Vec<Chart>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalVsCategoricalView {
    pub table: ContingencyTable,
    pub proportions: ProportionTable,
    pub charts: Vec<Chart>,
}

// ============================================================================
// Selection Helpers
// ============================================================================

/// Check that `name` exists and has the expected kind.
pub(crate) fn require_kind(
    classification: &ColumnClassification,
    name: &str,
    expected: ColumnKind,
) -> Result<()> {
    match classification.kind_of(name) {
        None => Err(AnalysisError::ColumnNotFound(name.to_string())),
        Some(kind) if kind == expected => Ok(()),
        Some(_) => Err(match expected {
            ColumnKind::Numeric => AnalysisError::NotNumeric(name.to_string()),
            ColumnKind::Categorical => AnalysisError::NotCategorical(name.to_string()),
        }),
    }
}

/// The caller's column, or the first column of the expected kind.
fn pick_column(
    classification: &ColumnClassification,
    selected: Option<&str>,
    expected: ColumnKind,
    skip: usize,
) -> Result<String> {
    if let Some(name) = selected {
        require_kind(classification, name, expected)?;
        return Ok(name.to_string());
    }

    let candidates = match expected {
        ColumnKind::Numeric => &classification.numeric,
        ColumnKind::Categorical => &classification.categorical,
    };
    candidates
        .get(skip)
        .cloned()
        .ok_or(AnalysisError::InsufficientSelection {
            required: skip + 1,
            selected: candidates.len(),
        })
}

/// The caller's numeric columns, or the first `default_count` of them.
pub(crate) fn pick_numeric_columns(
    classification: &ColumnClassification,
    selected: &[String],
    default_count: usize,
) -> Result<Vec<String>> {
    if selected.is_empty() {
        return Ok(classification.leading_numeric(default_count));
    }
    for name in selected {
        require_kind(classification, name, ColumnKind::Numeric)?;
    }
    Ok(selected.to_vec())
}

// ============================================================================
// Views
// ============================================================================

/// Shape, dtypes, memory and the first rows of the dataset.
pub fn general_info(session: &Session, config: &AnalysisConfig) -> Result<GeneralInfoView> {
    let dataset = session.dataset()?;
    let overview = stats::overview(dataset.df());
    let preview = stats::preview(dataset.df(), config.preview_rows)?;
    let charts = vec![Chart::Bar(charts::type_distribution_bar(
        &overview.type_distribution,
    ))];

    Ok(GeneralInfoView {
        info: dataset.info().clone(),
        overview,
        preview,
        charts,
    })
}

/// Numeric and categorical column lists with their counts.
pub fn variable_classification(session: &Session) -> Result<ClassificationView> {
    let classification = session.dataset()?.classification().clone();
    let n_numeric = classification.n_numeric();
    let n_categorical = classification.n_categorical();

    Ok(ClassificationView {
        charts: vec![Chart::Bar(charts::classification_bar(
            n_numeric,
            n_categorical,
        ))],
        classification,
        n_numeric,
        n_categorical,
    })
}

/// Summary table of every numeric column plus detail for one of them.
pub fn descriptive_statistics(
    session: &Session,
    selected: Option<&str>,
) -> Result<DescriptiveView> {
    let dataset = session.dataset()?;
    let classification = dataset.classification();
    let table = stats::describe(dataset.df(), &classification.numeric)?;

    let insight = match selected {
        Some(name) => {
            require_kind(classification, name, ColumnKind::Numeric)?;
            table.iter().find(|s| s.column == name).cloned()
        }
        None => table.first().cloned(),
    }
    .map(stats::numeric_insight);

    Ok(DescriptiveView { table, insight })
}

/// Missing cells per column.
pub fn missing_values(session: &Session, config: &AnalysisConfig) -> Result<MissingValuesView> {
    let dataset = session.dataset()?;
    let report = stats::missing_value_report(dataset.df(), config.percentage_decimals);
    let charts = if report.is_complete() {
        Vec::new()
    } else {
        vec![Chart::Bar(charts::missing_values_bar(&report))]
    };

    Ok(MissingValuesView { report, charts })
}

/// Histograms with mean and median markers for the selected numeric columns.
pub fn numeric_distribution(
    session: &Session,
    config: &AnalysisConfig,
    selected: &[String],
) -> Result<NumericDistributionView> {
    let dataset = session.dataset()?;
    let columns = pick_numeric_columns(
        dataset.classification(),
        selected,
        config.default_numeric_selection,
    )?;

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

    debug!("Prepared {} distribution charts", charts.len());
    Ok(NumericDistributionView {
        columns,
        summaries,
        charts,
    })
}

/// Counts and percentages of one categorical column.
pub fn categorical_distribution(
    session: &Session,
    selected: Option<&str>,
) -> Result<CategoricalDistributionView> {
    let dataset = session.dataset()?;
    let column = pick_column(
        dataset.classification(),
        selected,
        ColumnKind::Categorical,
        0,
    )?;
    let counts = stats::value_counts(dataset.df(), &column)?;
    let charts = vec![
        Chart::Bar(charts::value_counts_bar(&counts, false)),
        Chart::Pie(charts::value_counts_pie(&counts)),
    ];

    Ok(CategoricalDistributionView { counts, charts })
}

/// A numeric column summarised per category, with a grouped box plot.
pub fn numeric_vs_categorical(
    session: &Session,
    numeric: Option<&str>,
    categorical: Option<&str>,
) -> Result<NumericVsCategoricalView> {
    let dataset = session.dataset()?;
    let classification = dataset.classification();
    let numeric = pick_column(classification, numeric, ColumnKind::Numeric, 0)?;
    let categorical = pick_column(classification, categorical, ColumnKind::Categorical, 0)?;

    let grouped = stats::numeric_by_category(dataset.df(), &numeric, &categorical)?;
    let charts = vec![Chart::BoxPlot(charts::box_plot(&grouped))];

    Ok(NumericVsCategoricalView { grouped, charts })
}

/// Contingency table of two categorical columns, raw and row-normalised.
pub fn categorical_vs_categorical(
    session: &Session,
    rows: Option<&str>,
    cols: Option<&str>,
) -> Result<CategoricalVsCategoricalView> {
    let dataset = session.dataset()?;
    let classification = dataset.classification();
    let rows = pick_column(classification, rows, ColumnKind::Categorical, 0)?;
    let cols = pick_column(classification, cols, ColumnKind::Categorical, 1)?;

    let table = stats::crosstab(dataset.df(), &rows, &cols)?;
    let proportions = table.row_normalized();
    let charts = vec![
        Chart::Heatmap(charts::crosstab_heatmap(&table)),
        Chart::Heatmap(charts::proportion_heatmap(&proportions)),
    ];

    Ok(CategoricalVsCategoricalView {
        table,
        proportions,
        charts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Dataset;
    use polars::prelude::*;

    fn session() -> Session {
        let df = df!(
            "age" => [Some(30i64), Some(50), Some(40), None],
            "duration" => [120i64, 400, 90, 300],
            "job" => [Some("admin."), Some("admin."), Some("technician"), None],
            "y" => ["no", "yes", "no", "yes"]
        )
        .unwrap();
        let mut session = Session::new();
        session.replace(Dataset::from_dataframe("memory", 0, df));
        session
    }

    #[test]
    fn test_views_require_data() {
        let empty = Session::new();
        let config = AnalysisConfig::default();
        assert!(matches!(
            general_info(&empty, &config),
            Err(AnalysisError::NoDataLoaded)
        ));
        assert!(matches!(
            variable_classification(&empty),
            Err(AnalysisError::NoDataLoaded)
        ));
        assert!(matches!(
            missing_values(&empty, &config),
            Err(AnalysisError::NoDataLoaded)
        ));
        assert!(matches!(
            categorical_vs_categorical(&empty, None, None),
            Err(AnalysisError::NoDataLoaded)
        ));
    }

    #[test]
    fn test_general_info() {
        let config = AnalysisConfig::builder().preview_rows(2).build().unwrap();
        let view = general_info(&session(), &config).unwrap();
        assert_eq!(view.overview.rows, 4);
        assert_eq!(view.preview.rows.len(), 2);
        assert_eq!(view.charts.len(), 1);
    }

    #[test]
    fn test_variable_classification() {
        let view = variable_classification(&session()).unwrap();
        assert_eq!(view.n_numeric, 2);
        assert_eq!(view.n_categorical, 2);
        assert_eq!(view.classification.categorical, vec!["job", "y"]);
    }

    #[test]
    fn test_descriptive_defaults_to_first_numeric() {
        let view = descriptive_statistics(&session(), None).unwrap();
        assert_eq!(view.table.len(), 2);
        assert_eq!(view.insight.unwrap().summary.column, "age");

        let selected = descriptive_statistics(&session(), Some("duration")).unwrap();
        assert_eq!(selected.insight.unwrap().summary.column, "duration");

        assert!(matches!(
            descriptive_statistics(&session(), Some("job")),
            Err(AnalysisError::NotNumeric(_))
        ));
    }

    #[test]
    fn test_missing_values_chart_only_when_missing() {
        let config = AnalysisConfig::default();
        let view = missing_values(&session(), &config).unwrap();
        assert_eq!(view.report.total_missing, 2);
        assert_eq!(view.charts.len(), 1);
    }

    #[test]
    fn test_numeric_distribution_default_selection() {
        let config = AnalysisConfig::builder()
            .default_numeric_selection(1)
            .histogram_bins(4)
            .build()
            .unwrap();
        let view = numeric_distribution(&session(), &config, &[]).unwrap();
        assert_eq!(view.columns, vec!["age"]);
        assert_eq!(view.summaries[0].count, 3);

        let err = numeric_distribution(&session(), &config, &["y".to_string()]).unwrap_err();
        assert!(matches!(err, AnalysisError::NotNumeric(_)));
    }

    #[test]
    fn test_categorical_distribution() {
        let view = categorical_distribution(&session(), Some("job")).unwrap();
        assert_eq!(view.counts.entries[0].value, "admin.");
        assert_eq!(view.charts.len(), 2);

        assert!(matches!(
            categorical_distribution(&session(), Some("age")),
            Err(AnalysisError::NotCategorical(_))
        ));
        assert!(matches!(
            categorical_distribution(&session(), Some("nope")),
            Err(AnalysisError::ColumnNotFound(_))
        ));
    }

    #[test]
    fn test_numeric_vs_categorical() {
        let view = numeric_vs_categorical(&session(), Some("duration"), Some("y")).unwrap();
        assert_eq!(view.grouped.highest_mean_group.as_deref(), Some("yes"));
        assert_eq!(view.grouped.lowest_mean_group.as_deref(), Some("no"));
    }

    #[test]
    fn test_categorical_vs_categorical_defaults_and_duplicates() {
        let view = categorical_vs_categorical(&session(), None, None).unwrap();
        assert_eq!(view.table.row_column, "job");
        assert_eq!(view.table.col_column, "y");
        assert_eq!(view.table.grand_total(), 3);
        assert_eq!(view.charts.len(), 2);

        assert!(matches!(
            categorical_vs_categorical(&session(), Some("y"), Some("y")),
            Err(AnalysisError::DuplicateSelection(_))
        ));
    }
}
