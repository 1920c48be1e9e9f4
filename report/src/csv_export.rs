//! CSV export functionality

use std::fs::File;
use std::path::Path;

use anyhow::Result;
use csv::Writer;
use savina_driver_core::{InvocationRecord, InvocationStatus};

/// Writes one CSV row per invocation
pub struct CsvExporter;

impl CsvExporter {
    /// Export records to a CSV file
    pub fn export(records: &[InvocationRecord], path: &Path) -> Result<()> {
        let file = File::create(path)?;
        let mut wtr = Writer::from_writer(file);

        wtr.write_record([
            "runtime",
            "id",
            "name",
            "cores",
            "runs",
            "status",
            "exit_code",
            "started_at",
            "duration_ms",
            "stdout_path",
            "stderr_path",
            "error_message",
        ])?;

        for record in records {
            let (exit_code, message) = match &record.status {
                InvocationStatus::Exited { code } => (code.to_string(), String::new()),
                InvocationStatus::Failed { message } => (String::new(), message.clone()),
                _ => (String::new(), String::new()),
            };
            wtr.write_record([
                record.runtime.to_string(),
                record.id.clone(),
                record.name.clone(),
                record.cores.to_string(),
                record.runs.to_string(),
                record.status.label(),
                exit_code,
                record.started_at.to_rfc3339(),
                record.duration.as_millis().to_string(),
                record.stdout_path.display().to_string(),
                record.stderr_path.display().to_string(),
                message,
            ])?;
        }

        wtr.flush()?;
        Ok(())
    }
}
