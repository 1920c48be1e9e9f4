//! Planned invocations and their recorded outcomes

use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::catalog::{Benchmark, Runtime};
use crate::command::BenchmarkCommand;
use crate::naming::ResultFiles;

/// One benchmark run, fully resolved before anything is spawned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Catalog entry being run
    pub benchmark: Benchmark,
    /// Active core count
    pub cores: usize,
    /// Iterations passed to the benchmark
    pub runs: usize,
    /// Shell command line
    pub command: BenchmarkCommand,
    /// Redirect targets
    pub files: ResultFiles,
}

/// How an invocation ended
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum InvocationStatus {
    /// Process exited with a code
    Exited {
        /// Exit code reported by the process
        code: i32,
    },
    /// Process was terminated by a signal
    Signaled,
    /// Process outlived the configured timeout and was killed
    TimedOut,
    /// The driver was shut down while the process was running
    Interrupted,
    /// Files could not be opened or the process could not be spawned
    Failed {
        /// Error description
        message: String,
    },
}

impl InvocationStatus {
    /// Exit code zero
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationStatus::Exited { code: 0 })
    }

    /// Short label for tables and logs
    pub fn label(&self) -> String {
        match self {
            InvocationStatus::Exited { code } => format!("exit:{code}"),
            InvocationStatus::Signaled => "signaled".into(),
            InvocationStatus::TimedOut => "timed_out".into(),
            InvocationStatus::Interrupted => "interrupted".into(),
            InvocationStatus::Failed { .. } => "failed".into(),
        }
    }
}

impl From<std::process::ExitStatus> for InvocationStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => InvocationStatus::Exited { code },
            None => InvocationStatus::Signaled,
        }
    }
}

/// Outcome of one invocation, as written to the run summary
#[derive(Debug, Clone, Serialize)]
pub struct InvocationRecord {
    /// Runtime of the benchmark
    pub runtime: Runtime,
    /// Benchmark number
    pub id: String,
    /// Benchmark name
    pub name: String,
    /// Active core count
    pub cores: usize,
    /// Iterations requested
    pub runs: usize,
    /// Command line that was run
    pub command: String,
    /// Standard output file
    pub stdout_path: PathBuf,
    /// Standard error file
    pub stderr_path: PathBuf,
    /// Wall-clock start
    pub started_at: DateTime<Utc>,
    /// Time from spawn to exit
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
    /// How the process ended
    #[serde(flatten)]
    pub status: InvocationStatus,
}

impl InvocationRecord {
    /// Build a record for a finished invocation
    pub fn new(
        invocation: &Invocation,
        started_at: DateTime<Utc>,
        duration: Duration,
        status: InvocationStatus,
    ) -> Self {
        Self {
            runtime: invocation.benchmark.runtime,
            id: invocation.benchmark.id.to_string(),
            name: invocation.benchmark.name.to_string(),
            cores: invocation.cores,
            runs: invocation.runs,
            command: invocation.command.to_string(),
            stdout_path: invocation.files.stdout.clone(),
            stderr_path: invocation.files.stderr.clone(),
            started_at,
            duration,
            status,
        }
    }
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
