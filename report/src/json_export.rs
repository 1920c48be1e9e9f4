//! JSON export functionality

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use savina_driver_core::RunOutcome;
use serde_json::json;

/// Writes the run summary and every invocation record as JSON
pub struct JsonExporter;

impl JsonExporter {
    /// Export summary and records to a JSON file
    pub fn export(outcome: &RunOutcome, path: &Path) -> Result<()> {
        let summary = outcome.summary();

        let output = json!({
            "summary": {
                "total_invocations": summary.total_invocations,
                "succeeded": summary.succeeded,
                "nonzero_exits": summary.nonzero_exits,
                "failed": summary.failed,
                "timed_out": summary.timed_out,
                "interrupted": summary.interrupted,
                "success_rate_percent": summary.success_rate() * 100.0,
                "core_counts": summary.core_counts,
                "busy_ms": summary.busy_time.as_millis() as u64,
                "elapsed_ms": summary.elapsed.as_millis() as u64,
            },
            "invocations": outcome.records,
        });

        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, &output)?;

        Ok(())
    }
}
