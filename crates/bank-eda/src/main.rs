//! CLI entry point for the bank marketing analysis engine.

use anyhow::Result;
use bank_eda::charts::{ChartRenderer, TextRenderer, format_value};
use bank_eda::views::{self, DynamicRequest, DynamicView};
use bank_eda::{AnalysisConfig, Chart, ColumnSummary, ReportGenerator, Session, stats};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Exploratory analysis of the bank marketing campaign dataset",
    long_about = "Loads a ';'-separated bank marketing table and prints one dashboard view.\n\n\
                  EXAMPLES:\n  \
                  # Dataset overview\n  \
                  bank-eda -i bank-additional-full.csv info\n\n  \
                  # Age by subscription outcome\n  \
                  bank-eda -i bank-additional-full.csv num-cat --numeric age --categorical y\n\n  \
                  # Clients aged 30 to 40, as JSON\n  \
                  bank-eda -i bank-additional-full.csv --json range --column age --min 30 --max 40\n\n  \
                  # Full report written to ./outputs\n  \
                  bank-eda -i bank-additional-full.csv report --output outputs"
)]
struct Args {
    /// Path to the ';'-separated data file
    #[arg(short, long)]
    input: PathBuf,

    /// JSON file with analysis settings (separator, bins, findings columns, ...)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the number of histogram bins
    #[arg(long)]
    bins: Option<usize>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Only show warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// Output JSON to stdout instead of human-readable tables
    ///
    /// Disables all logs; only the view is written.
    #[arg(long)]
    json: bool,

    #[command(subcommand)]
    view: View,
}

#[derive(Subcommand, Debug)]
enum View {
    /// Shape, dtypes, memory usage and the first rows
    Info,
    /// Numeric and categorical column lists
    Classify,
    /// Summary statistics of every numeric column
    Describe {
        /// Column to show spread and skew for (default: first numeric)
        #[arg(long)]
        column: Option<String>,
    },
    /// Summary of a single column, numeric or categorical
    Summary {
        #[arg(long)]
        column: String,
    },
    /// Missing values per column
    Missing,
    /// Histograms of numeric columns
    Numeric {
        /// Columns to plot (default: first numeric columns)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Frequencies of a categorical column
    Categorical {
        /// Column to count (default: first categorical)
        #[arg(long)]
        column: Option<String>,
    },
    /// A numeric column summarised per category
    NumCat {
        #[arg(long)]
        numeric: Option<String>,
        #[arg(long)]
        categorical: Option<String>,
    },
    /// Contingency table of two categorical columns
    CatCat {
        #[arg(long)]
        rows: Option<String>,
        #[arg(long)]
        cols: Option<String>,
    },
    /// Rows whose value lies in an inclusive range
    Range {
        #[arg(long)]
        column: String,
        #[arg(long)]
        min: Option<f64>,
        #[arg(long)]
        max: Option<f64>,
    },
    /// Histograms of two or more numeric columns side by side
    Compare {
        #[arg(long, value_delimiter = ',', required = true)]
        columns: Vec<String>,
    },
    /// Correlation matrix of numeric columns
    Correlate {
        /// Columns to correlate (default: first numeric columns)
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Campaign acceptance figures
    Findings,
    /// Every view with its default selection
    Report {
        /// Write `<input>_report.json` into this directory instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Initialize the tracing subscriber for logging.
///
/// When `json_output` is true, logging is completely disabled to ensure
/// only JSON is written to stdout.
fn init_logging(level: &str, quiet: bool, json_output: bool) {
    if json_output {
        return;
    }

    use tracing_subscriber::EnvFilter;

    let effective_level = if quiet { "warn" } else { level };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(effective_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> Result<AnalysisConfig> {
    let mut config = match &args.config {
        Some(path) => {
            debug!("Reading config from {}", path.display());
            AnalysisConfig::from_json_file(path)?
        }
        None => AnalysisConfig::default(),
    };

    if let Some(bins) = args.bins {
        config.histogram_bins = bins;
        config.validate()?;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(&args.log_level, args.quiet, args.json);

    let config = load_config(&args)?;

    info!("Loading dataset from: {}", args.input.display());
    let mut session = Session::new();
    session.load_file(&args.input, &config)?;

    run_view(&args, &session, &config)
}

fn run_view(args: &Args, session: &Session, config: &AnalysisConfig) -> Result<()> {
    let json = args.json;
    match &args.view {
        View::Info => {
            let view = views::general_info(session, config)?;
            emit(json, &view, || {
                print_section("DATASET OVERVIEW");
                println!("  File: {}", view.info.source);
                println!("  Rows: {}", view.overview.rows);
                println!("  Columns: {}", view.overview.columns);
                println!("  Memory: {:.2} MB", view.overview.memory_bytes as f64 / 1_048_576.0);
                println!("  Missing cells: {}", view.overview.total_missing);
                println!();
                println!("{:<24} {:<12} {:>10}", "Column", "Type", "Missing");
                println!("{}", "-".repeat(48));
                for col in &view.overview.column_info {
                    println!(
                        "{:<24} {:<12} {:>10}",
                        truncate_str(&col.name, 23),
                        col.dtype,
                        col.null_count
                    );
                }
                println!();
                print_section("FIRST ROWS");
                println!("{}", view.preview.columns.join(" | "));
                for row in &view.preview.rows {
                    let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
                    println!("{}", cells.join(" | "));
                }
                println!();
                render(&view.charts)
            })
        }
        View::Classify => {
            let view = views::variable_classification(session)?;
            emit(json, &view, || {
                print_section("VARIABLE CLASSIFICATION");
                println!("  Numeric ({}): {}", view.n_numeric, view.classification.numeric.join(", "));
                println!(
                    "  Categorical ({}): {}",
                    view.n_categorical,
                    view.classification.categorical.join(", ")
                );
                println!();
                render(&view.charts)
            })
        }
        View::Describe { column } => {
            let view = views::descriptive_statistics(session, column.as_deref())?;
            emit(json, &view, || {
                print_section("DESCRIPTIVE STATISTICS");
                println!(
                    "{:<16} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                    "Column", "Count", "Mean", "Std", "Min", "Median", "Max", "Mode"
                );
                println!("{}", "-".repeat(90));
                for s in &view.table {
                    println!(
                        "{:<16} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
                        truncate_str(&s.column, 15),
                        s.count,
                        format_value(s.mean),
                        format_value(s.std),
                        format_value(s.min),
                        format_value(s.median),
                        format_value(s.max),
                        format_value(s.mode)
                    );
                }
                if let Some(insight) = &view.insight {
                    println!();
                    print_section(&format!("INSIGHT: {}", insight.summary.column));
                    println!("  Range: {}", format_value(insight.range));
                    println!("  IQR: {}", format_value(insight.iqr));
                    println!(
                        "  Coefficient of variation: {}%",
                        format_value(insight.coefficient_of_variation)
                    );
                    if let Some(skew) = insight.skew {
                        println!("  Skew: {skew:?}");
                    }
                }
                Ok(())
            })
        }
        View::Summary { column } => {
            let summary = stats::summarize_column(session.dataset()?.df(), column)?;
            emit(json, &summary, || {
                print_section(&format!("SUMMARY: {column}"));
                match &summary {
                    ColumnSummary::Numeric(s) => {
                        println!("  Count: {}", s.count);
                        for (name, value) in [
                            ("Mean", s.mean),
                            ("Median", s.median),
                            ("Mode", s.mode),
                            ("Std", s.std),
                            ("Min", s.min),
                            ("Q1", s.q1),
                            ("Q3", s.q3),
                            ("Max", s.max),
                        ] {
                            println!("  {name}: {}", format_value(value));
                        }
                    }
                    ColumnSummary::Categorical(s) => {
                        println!("  Count: {}", s.count);
                        println!("  Unique: {}", s.unique);
                        println!(
                            "  Mode: {} ({} times)",
                            s.mode.as_deref().unwrap_or("N/A"),
                            s.mode_frequency
                        );
                    }
                }
                Ok(())
            })
        }
        View::Missing => {
            let view = views::missing_values(session, config)?;
            emit(json, &view, || {
                print_section("MISSING VALUES");
                println!(
                    "  Total: {} of {} cells ({:.2}%)",
                    view.report.total_missing, view.report.total_cells, view.report.total_percentage
                );
                if view.report.is_complete() {
                    println!("  No missing values.");
                    return Ok(());
                }
                for entry in view.report.with_missing() {
                    println!(
                        "  {:<24} {:>8} {:>8.2}%",
                        truncate_str(&entry.column, 23),
                        entry.missing_count,
                        entry.missing_percentage
                    );
                }
                println!();
                render(&view.charts)
            })
        }
        View::Numeric { columns } => {
            let view = views::numeric_distribution(session, config, columns)?;
            emit(json, &view, || render(&view.charts))
        }
        View::Categorical { column } => {
            let view = views::categorical_distribution(session, column.as_deref())?;
            emit(json, &view, || {
                print_section(&format!("VALUE COUNTS: {}", view.counts.column));
                for entry in &view.counts.entries {
                    println!(
                        "  {:<24} {:>8} {:>8.2}%",
                        truncate_str(&entry.value, 23),
                        entry.count,
                        entry.proportion * 100.0
                    );
                }
                println!();
                render(&view.charts)
            })
        }
        View::NumCat {
            numeric,
            categorical,
        } => {
            let view =
                views::numeric_vs_categorical(session, numeric.as_deref(), categorical.as_deref())?;
            emit(json, &view, || {
                render(&view.charts)?;
                if let Some(group) = &view.grouped.highest_mean_group {
                    println!("  Highest mean {}: {}", view.grouped.numeric_column, group);
                }
                if let Some(group) = &view.grouped.lowest_mean_group {
                    println!("  Lowest mean {}: {}", view.grouped.numeric_column, group);
                }
                Ok(())
            })
        }
        View::CatCat { rows, cols } => {
            let view = views::categorical_vs_categorical(session, rows.as_deref(), cols.as_deref())?;
            emit(json, &view, || render(&view.charts))
        }
        View::Range { column, min, max } => dynamic(
            args,
            session,
            config,
            DynamicRequest::RangeFilter {
                column: column.clone(),
                min: *min,
                max: *max,
            },
        ),
        View::Compare { columns } => dynamic(
            args,
            session,
            config,
            DynamicRequest::Comparison {
                columns: columns.clone(),
            },
        ),
        View::Correlate { columns } => dynamic(
            args,
            session,
            config,
            DynamicRequest::Correlation {
                columns: columns.clone(),
            },
        ),
        View::Findings => {
            let findings = views::findings(session, config)?;
            emit(json, &findings, || {
                print_section("KEY FINDINGS");
                println!("  Clients: {}", findings.total_clients);
                println!("  Acceptance rate: {}%", format_value(findings.acceptance_rate));
                println!("  Mean age: {}", format_value(findings.mean_age));
                println!("  Mean call duration: {}", format_value(findings.mean_duration));
                if let Some(job) = &findings.most_common_job {
                    println!("  Most common job: {job}");
                }
                println!();
                println!("  Acceptance by education:");
                for entry in &findings.acceptance_by_education {
                    println!("    {:<24} {:>7.2}%", truncate_str(&entry.label, 23), entry.rate);
                }
                println!("  Acceptance by contact channel:");
                for entry in &findings.acceptance_by_contact {
                    println!("    {:<24} {:>7.2}%", truncate_str(&entry.label, 23), entry.rate);
                }
                println!();
                println!(
                    "  Mean duration accepted / rejected: {} / {}",
                    format_value(findings.mean_duration_accepted),
                    format_value(findings.mean_duration_rejected)
                );
                println!("  Duration lift: {}%", format_value(findings.duration_lift));
                if let Some(channel) = &findings.best_contact_channel {
                    println!("  Best contact channel: {channel}");
                }
                Ok(())
            })
        }
        View::Report { output } => {
            let report = ReportGenerator::build_report(session, config)?;
            match output {
                Some(dir) => {
                    let path = ReportGenerator::new(dir.clone())
                        .write_report_to_file(&report, &report_base_name(&args.input))?;
                    if json {
                        println!("{}", serde_json::json!({ "report": path }));
                    } else {
                        println!("Report written to {}", path.display());
                    }
                }
                None => println!("{}", serde_json::to_string_pretty(&report)?),
            }
            Ok(())
        }
    }
}

fn dynamic(
    args: &Args,
    session: &Session,
    config: &AnalysisConfig,
    request: DynamicRequest,
) -> Result<()> {
    let view = views::dynamic_analysis(session, config, &request)?;
    emit(args.json, &view, || match &view {
        DynamicView::RangeFilter(result) => {
            print_section(&format!(
                "RANGE FILTER: {} in [{}, {}]",
                result.column, result.min, result.max
            ));
            println!(
                "  Matched: {} of {} rows ({:.2}%)",
                result.matched_rows, result.total_rows, result.matched_percentage
            );
            println!("  Excluded: {}", result.excluded_rows);
            println!();
            println!("{}", result.preview.columns.join(" | "));
            for row in &result.preview.rows {
                let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("")).collect();
                println!("{}", cells.join(" | "));
            }
            Ok(())
        }
        DynamicView::Comparison(result) => render(&result.charts),
        DynamicView::Correlation(result) => render(&result.charts),
    })
}

/// Print `value` as JSON, or run the human-readable printer.
fn emit<T: Serialize>(json: bool, value: &T, human: impl FnOnce() -> Result<()>) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
        Ok(())
    } else {
        human()
    }
}

fn render(charts: &[Chart]) -> Result<()> {
    TextRenderer::new(std::io::stdout().lock()).render_all(charts)?;
    Ok(())
}

fn print_section(title: &str) {
    println!("{title}");
    println!("{}", "-".repeat(40));
}

fn report_base_name(input: &Path) -> String {
    input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "dataset".to_string())
}

/// Truncate a string to max length, adding "..." if truncated.
fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
