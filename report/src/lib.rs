//! Run summaries for savina-driver
//!
//! This crate writes the outcome of a driver run next to the raw benchmark
//! output:
//!
//! - JSON (summary plus one object per invocation)
//! - CSV (one row per invocation)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod csv_export;
pub mod json_export;

pub use csv_export::CsvExporter;
pub use json_export::JsonExporter;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use savina_driver_core::RunOutcome;

/// File name of the JSON summary
pub const JSON_SUMMARY_FILE: &str = "driver_summary.json";

/// File name of the CSV summary
pub const CSV_SUMMARY_FILE: &str = "driver_summary.csv";

/// Write both summaries into `dir`, creating it if needed
///
/// Returns the paths written, JSON first.
pub fn write_summaries(outcome: &RunOutcome, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create summary directory: {}", dir.display()))?;

    let json_path = dir.join(JSON_SUMMARY_FILE);
    JsonExporter::export(outcome, &json_path)
        .with_context(|| format!("Failed to export JSON to: {}", json_path.display()))?;

    let csv_path = dir.join(CSV_SUMMARY_FILE);
    CsvExporter::export(&outcome.records, &csv_path)
        .with_context(|| format!("Failed to export CSV to: {}", csv_path.display()))?;

    Ok(vec![json_path, csv_path])
}
