//! Report generation module.
//!
//! An [`AnalysisReport`] bundles every dashboard view with its default
//! selections. It is what `bank-eda report` prints with `--json` and what it
//! writes to disk with `--output`.
//!
//! # Example
//!
//! ```rust,ignore
//! use bank_eda::reporting::ReportGenerator;
//!
//! let report = ReportGenerator::build_report(&session, &config)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//!
//! let generator = ReportGenerator::new(PathBuf::from("outputs"));
//! generator.write_report_to_file(&report, "bank-additional")?;
//! ```

mod generator;

pub use generator::{AnalysisReport, ReportGenerator};
