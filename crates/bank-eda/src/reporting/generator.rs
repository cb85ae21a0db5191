use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::session::Session;
use crate::views::{
    self, CategoricalDistributionView, CategoricalVsCategoricalView, ClassificationView,
    CorrelationResult, DescriptiveView, DynamicRequest, DynamicView, Findings, GeneralInfoView,
    MissingValuesView, NumericDistributionView, NumericVsCategoricalView,
};

// ============================================================================
// Report Types
// ============================================================================

/// Every view of the dashboard computed with its default selection.
///
/// Views whose default selection is impossible for the loaded dataset (no
/// categorical column to group by, fewer than two numeric columns to
/// correlate, findings columns absent) are `None`, with the reason recorded
/// in `warnings`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Timestamp when the report was generated
    pub generated_at: String,
    /// Path or upload name of the analysed table
    pub input_file: String,

    pub general_info: GeneralInfoView,
    pub classification: ClassificationView,
    pub descriptive: DescriptiveView,
    pub missing_values: MissingValuesView,
    pub numeric_distribution: NumericDistributionView,
    /// One entry per categorical column.
    pub categorical_distributions: Vec<CategoricalDistributionView>,
    pub numeric_vs_categorical: Option<NumericVsCategoricalView>,
    pub categorical_vs_categorical: Option<CategoricalVsCategoricalView>,
    pub correlation: Option<CorrelationResult>,
    pub findings: Option<Findings>,

    /// Views that were skipped and why.
    pub warnings: Vec<String>,
}

// ============================================================================
// Generator
// ============================================================================

pub struct ReportGenerator {
    output_dir: PathBuf,
}

impl Default for ReportGenerator {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportGenerator {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    /// Compute every view for the loaded dataset.
    pub fn build_report(session: &Session, config: &AnalysisConfig) -> Result<AnalysisReport> {
        let dataset = session.dataset()?;
        let mut warnings = Vec::new();

        let classification = views::variable_classification(session)?;
        let categorical_distributions = classification
            .classification
            .categorical
            .iter()
            .map(|name| views::categorical_distribution(session, Some(name)))
            .collect::<Result<Vec<_>>>()?;

        let correlation = skip_invalid(
            "correlation",
            views::dynamic_analysis(
                session,
                config,
                &DynamicRequest::Correlation {
                    columns: Vec::new(),
                },
            ),
            &mut warnings,
        )?
        .and_then(|view| match view {
            DynamicView::Correlation(result) => Some(result),
            _ => None,
        });

        let report = AnalysisReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            input_file: dataset.info().source.clone(),
            general_info: views::general_info(session, config)?,
            descriptive: views::descriptive_statistics(session, None)?,
            missing_values: views::missing_values(session, config)?,
            numeric_distribution: views::numeric_distribution(session, config, &[])?,
            categorical_distributions,
            numeric_vs_categorical: skip_invalid(
                "numeric vs categorical",
                views::numeric_vs_categorical(session, None, None),
                &mut warnings,
            )?,
            categorical_vs_categorical: skip_invalid(
                "categorical vs categorical",
                views::categorical_vs_categorical(session, None, None),
                &mut warnings,
            )?,
            correlation,
            findings: skip_invalid("findings", views::findings(session, config), &mut warnings)?,
            classification,
            warnings,
        };

        debug!(
            "Built report for '{}' with {} warnings",
            report.input_file,
            report.warnings.len()
        );
        Ok(report)
    }

    /// Write the report as pretty JSON to `<output_dir>/<base_name>_report.json`.
    pub fn write_report_to_file(
        &self,
        report: &AnalysisReport,
        report_base_name: &str,
    ) -> Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;

        let report_path = self
            .output_dir
            .join(format!("{}_report.json", report_base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(serde_json::to_string_pretty(report)?.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}

/// Turn a selection error into a skipped view; anything else is fatal.
fn skip_invalid<T>(view: &str, result: Result<T>, warnings: &mut Vec<String>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_invalid_selection() => {
            warn!("Skipping {} view: {}", view, e);
            warnings.push(format!("{view}: {e}"));
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
