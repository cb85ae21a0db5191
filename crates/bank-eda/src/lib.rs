//! Bank Marketing Exploratory Analysis Library
//!
//! The analysis core of the bank marketing dashboard, built on Polars.
//!
//! # Overview
//!
//! - **Loading**: `;`-separated tables with structural checks
//! - **Classification**: every column is either numeric or categorical
//! - **Descriptive statistics**: overview, column summaries, missing values, value counts
//! - **Bivariate analysis**: numeric-by-category summaries and contingency tables
//! - **Correlation**: pairwise-complete Pearson matrices
//! - **Charts**: histograms, bars, pies, box plots and heatmaps ready to draw
//! - **Views**: one function per dashboard view, plus campaign findings
//! - **Reports**: every view with its default selection, as JSON
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use bank_eda::{AnalysisConfig, Session, views};
//!
//! let config = AnalysisConfig::default();
//! let mut session = Session::new();
//! session.load_file("bank-additional-full.csv", &config)?;
//!
//! let info = views::general_info(&session, &config)?;
//! println!("{} rows x {} columns", info.overview.rows, info.overview.columns);
//!
//! let grouped = views::numeric_vs_categorical(&session, Some("age"), Some("y"))?;
//! println!("Highest mean age: {:?}", grouped.grouped.highest_mean_group);
//! ```
//!
//! # Configuration
//!
//! Use [`AnalysisConfig`] to change the separator, histogram bins, default
//! selections or the columns the findings view reads:
//!
//! ```rust,ignore
//! use bank_eda::config::*;
//!
//! let config = AnalysisConfig::builder()
//!     .histogram_bins(40)
//!     .preview_rows(10)
//!     .default_correlation_selection(8)
//!     .build()?;
//! ```
//!
//! # Rendering
//!
//! Views return [`charts::Chart`] values. Anything implementing
//! [`charts::ChartRenderer`] can draw them; [`charts::TextRenderer`] writes
//! them as text:
//!
//! ```rust,ignore
//! use bank_eda::charts::{ChartRenderer, TextRenderer};
//!
//! let view = views::missing_values(&session, &config)?;
//! TextRenderer::new(std::io::stdout()).render_all(&view.charts)?;
//! ```

pub mod charts;
pub mod classifier;
pub mod config;
pub mod error;
pub mod loader;
pub mod reporting;
pub mod session;
pub mod stats;
pub mod types;
pub mod utils;
pub mod views;

// Re-exports for convenient access
pub use charts::{Chart, ChartRenderer, TextRenderer};
pub use classifier::{ColumnClassification, ColumnKind};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ConfigValidationError, FindingsConfig};
pub use error::{AnalysisError, Result as AnalysisResult, ResultExt};
pub use loader::DatasetLoader;
pub use reporting::{AnalysisReport, ReportGenerator};
pub use session::{Dataset, DatasetInfo, Session};
pub use types::{
    CategoricalSummary, CategoryCount, ColumnSummary, ContingencyTable, CorrelationMatrix,
    DatasetOverview, MissingValueReport, NumericByCategory, NumericSummary, ValueCounts,
};
pub use views::{DynamicRequest, DynamicView, Findings};
