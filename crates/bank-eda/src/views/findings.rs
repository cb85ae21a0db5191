//! Campaign findings: acceptance rates and the figures that explain them.

use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::config::{AnalysisConfig, FindingsConfig};
use crate::error::{Result, ResultExt};
use crate::session::Session;
use crate::utils::{frequencies, mean, numeric_values, percentage, string_mode, string_values};

/// Acceptance within one category value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    pub label: String,
    pub accepted: usize,
    pub total: usize,
    /// `accepted / total * 100`
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Findings {
    pub total_clients: usize,
    pub accepted: usize,
    /// Share of all rows whose target equals the positive label, in percent.
    pub acceptance_rate: Option<f64>,
    pub mean_age: Option<f64>,
    pub mean_duration: Option<f64>,
    pub most_common_job: Option<String>,
    /// Highest rate first.
    pub acceptance_by_education: Vec<RateEntry>,
    /// Ordered by channel label.
    pub acceptance_by_contact: Vec<RateEntry>,
    pub mean_duration_accepted: Option<f64>,
    /// Mean over rows whose target equals the negative label.
    pub mean_duration_rejected: Option<f64>,
    /// How much longer accepted calls last, `(accepted / rejected - 1) * 100`.
    pub duration_lift: Option<f64>,
    /// Channel with the most acceptances.
    pub best_contact_channel: Option<String>,
}

/// Headline campaign figures for the configured columns.
pub fn findings(session: &Session, config: &AnalysisConfig) -> Result<Findings> {
    let dataset = session.dataset()?;
    let df = dataset.df();
    let cols = &config.findings;

    let outcomes = outcomes(df, cols).context("Reading target column")?;
    let total_clients = outcomes.len();
    let accepted = outcomes.iter().filter(|&&o| o == Outcome::Accepted).count();
    let acceptance_rate = (total_clients > 0).then(|| percentage(accepted, total_clients));

    let ages: Vec<f64> = numeric_values(df, &cols.age_column)?
        .into_iter()
        .flatten()
        .collect();
    let durations = numeric_values(df, &cols.duration_column)?;
    let all_durations: Vec<f64> = durations.iter().flatten().copied().collect();

    let jobs = string_values(df, &cols.job_column)?;
    let most_common_job = string_mode(&frequencies(jobs.iter().flatten().map(String::as_str)))
        .map(|(job, _)| job);

    let mut acceptance_by_education =
        rates_by(&string_values(df, &cols.education_column)?, &outcomes);
    acceptance_by_education.sort_by(|a, b| b.rate.total_cmp(&a.rate));

    let acceptance_by_contact = rates_by(&string_values(df, &cols.contact_column)?, &outcomes);
    let best_contact_channel = acceptance_by_contact
        .iter()
        .filter(|e| e.accepted > 0)
        .min_by(|a, b| b.accepted.cmp(&a.accepted))
        .map(|e| e.label.clone());

    let mut accepted_durations = Vec::new();
    let mut rejected_durations = Vec::new();
    for (duration, outcome) in durations.iter().zip(&outcomes) {
        match (duration, outcome) {
            (Some(d), Outcome::Accepted) => accepted_durations.push(*d),
            (Some(d), Outcome::Rejected) => rejected_durations.push(*d),
            _ => {}
        }
    }
    let mean_duration_accepted = mean(&accepted_durations);
    let mean_duration_rejected = mean(&rejected_durations);
    let duration_lift = mean_duration_accepted
        .zip(mean_duration_rejected)
        .filter(|(_, rejected)| *rejected != 0.0)
        .map(|(accepted, rejected)| (accepted / rejected - 1.0) * 100.0);

    debug!("Findings: {} of {} clients accepted", accepted, total_clients);

    Ok(Findings {
        total_clients,
        accepted,
        acceptance_rate,
        mean_age: mean(&ages),
        mean_duration: mean(&all_durations),
        most_common_job,
        acceptance_by_education,
        acceptance_by_contact,
        mean_duration_accepted,
        mean_duration_rejected,
        duration_lift,
        best_contact_channel,
    })
}

/// Campaign outcome of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Accepted,
    Rejected,
    /// Missing target or a label that is neither positive nor negative.
    Unknown,
}

fn outcomes(df: &DataFrame, cols: &FindingsConfig) -> Result<Vec<Outcome>> {
    Ok(string_values(df, &cols.target_column)?
        .into_iter()
        .map(|value| match value.as_deref() {
            Some(label) if label == cols.positive_label => Outcome::Accepted,
            Some(label) if label == cols.negative_label => Outcome::Rejected,
            _ => Outcome::Unknown,
        })
        .collect())
}

/// Acceptance rate per non-missing label, in label order.
///
/// The rate is over every row with the label, whatever its outcome.
fn rates_by(labels: &[Option<String>], outcomes: &[Outcome]) -> Vec<RateEntry> {
    let mut groups: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for (label, &outcome) in labels.iter().zip(outcomes) {
        let Some(label) = label else {
            continue;
        };
        let entry = groups.entry(label.as_str()).or_default();
        entry.1 += 1;
        if outcome == Outcome::Accepted {
            entry.0 += 1;
        }
    }

    groups
        .into_iter()
        .map(|(label, (accepted, total))| RateEntry {
            label: label.to_string(),
            accepted,
            total,
            rate: percentage(accepted, total),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalysisError;
    use crate::session::Dataset;
    use polars::prelude::*;

    fn session() -> Session {
        let df = df!(
            "age" => [30i64, 40, 50, 60],
            "job" => ["admin.", "technician", "admin.", "retired"],
            "education" => ["basic.4y", "university.degree", "university.degree", "basic.4y"],
            "contact" => ["cellular", "telephone", "cellular", "cellular"],
            "duration" => [300i64, 100, 500, 100],
            "y" => ["yes", "no", "yes", "no"]
        )
        .unwrap();
        let mut session = Session::new();
        session.replace(Dataset::from_dataframe("memory", 0, df));
        session
    }

    #[test]
    fn test_headline_figures() {
        let findings = findings(&session(), &AnalysisConfig::default()).unwrap();
        assert_eq!(findings.total_clients, 4);
        assert_eq!(findings.accepted, 2);
        assert_eq!(findings.acceptance_rate, Some(50.0));
        assert_eq!(findings.mean_age, Some(45.0));
        assert_eq!(findings.mean_duration, Some(250.0));
        assert_eq!(findings.most_common_job.as_deref(), Some("admin."));
    }

    #[test]
    fn test_duration_lift() {
        let findings = findings(&session(), &AnalysisConfig::default()).unwrap();
        assert_eq!(findings.mean_duration_accepted, Some(400.0));
        assert_eq!(findings.mean_duration_rejected, Some(100.0));
        assert_eq!(findings.duration_lift, Some(300.0));
    }

    #[test]
    fn test_unlabelled_outcomes_excluded_from_rejected_duration() {
        let df = df!(
            "age" => [30i64, 40, 50, 60],
            "job" => ["admin.", "technician", "admin.", "retired"],
            "education" => ["basic.4y", "basic.4y", "basic.4y", "basic.4y"],
            "contact" => ["cellular", "telephone", "cellular", "cellular"],
            "duration" => [400i64, 100, 1000, 1000],
            "y" => [Some("yes"), Some("no"), None, Some("unknown")]
        )
        .unwrap();
        let mut session = Session::new();
        session.replace(Dataset::from_dataframe("memory", 0, df));

        let findings = findings(&session, &AnalysisConfig::default()).unwrap();
        assert_eq!(findings.mean_duration_rejected, Some(100.0));
        assert_eq!(findings.duration_lift, Some(300.0));
        // Every row still counts towards the acceptance rate.
        assert_eq!(findings.acceptance_rate, Some(25.0));
        assert_eq!(findings.acceptance_by_education[0].total, 4);
    }

    #[test]
    fn test_rates_by_category() {
        let findings = findings(&session(), &AnalysisConfig::default()).unwrap();

        let education: Vec<_> = findings
            .acceptance_by_education
            .iter()
            .map(|e| (e.label.as_str(), e.rate))
            .collect();
        assert_eq!(
            education,
            vec![("basic.4y", 50.0), ("university.degree", 50.0)]
        );

        assert_eq!(findings.acceptance_by_contact[0].label, "cellular");
        assert_eq!(findings.acceptance_by_contact[0].accepted, 2);
        assert_eq!(findings.acceptance_by_contact[1].accepted, 0);
        assert_eq!(findings.best_contact_channel.as_deref(), Some("cellular"));
    }

    #[test]
    fn test_missing_configured_column() {
        let config = AnalysisConfig::builder()
            .findings(FindingsConfig {
                age_column: "client_age".to_string(),
                ..FindingsConfig::default()
            })
            .build()
            .unwrap();
        assert!(matches!(
            findings(&session(), &config),
            Err(AnalysisError::ColumnNotFound(ref c)) if c == "client_age"
        ));
    }

    #[test]
    fn test_requires_data() {
        assert!(matches!(
            findings(&Session::new(), &AnalysisConfig::default()),
            Err(AnalysisError::NoDataLoaded)
        ));
    }
}
