//! Run summary aggregation

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;

use crate::record::{InvocationRecord, InvocationStatus};

/// Aggregated counts over all invocations of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SweepSummary {
    /// Invocations attempted
    pub total_invocations: usize,

    /// Exit code zero
    pub succeeded: usize,

    /// Ran but exited non-zero or by signal
    pub nonzero_exits: usize,

    /// Never ran (open or spawn failure)
    pub failed: usize,

    /// Killed after the timeout
    pub timed_out: usize,

    /// Cut short by shutdown
    pub interrupted: usize,

    /// Distinct core counts visited, ascending
    pub core_counts: Vec<usize>,

    /// Sum of invocation durations
    #[serde(rename = "busy_ms", serialize_with = "serialize_millis")]
    pub busy_time: Duration,

    /// Wall-clock time of the whole run, activation and settling included
    ///
    /// Records alone cannot tell this; it is zero unless the summary comes
    /// from [`RunOutcome::summary`].
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

impl SweepSummary {
    /// Fraction of invocations that exited zero (0.0 - 1.0)
    pub fn success_rate(&self) -> f64 {
        if self.total_invocations > 0 {
            self.succeeded as f64 / self.total_invocations as f64
        } else {
            0.0
        }
    }

    /// Everything that did not exit zero
    pub fn unsuccessful(&self) -> usize {
        self.total_invocations - self.succeeded
    }
}

/// Everything a finished (or interrupted) run produced
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// One record per attempted invocation, in execution order
    pub records: Vec<InvocationRecord>,

    /// Wall-clock time from start to finish
    pub elapsed: Duration,
}

impl RunOutcome {
    /// Summary including the run's wall-clock time
    pub fn summary(&self) -> SweepSummary {
        SweepSummary {
            elapsed: self.elapsed,
            ..summarize_records(&self.records)
        }
    }
}

/// Aggregate invocation records into a summary
pub fn summarize_records(records: &[InvocationRecord]) -> SweepSummary {
    let mut summary = SweepSummary {
        total_invocations: records.len(),
        ..Default::default()
    };
    let mut cores = BTreeSet::new();

    for record in records {
        cores.insert(record.cores);
        summary.busy_time += record.duration;
        match record.status {
            InvocationStatus::Exited { code: 0 } => summary.succeeded += 1,
            InvocationStatus::Exited { .. } | InvocationStatus::Signaled => {
                summary.nonzero_exits += 1
            }
            InvocationStatus::Failed { .. } => summary.failed += 1,
            InvocationStatus::TimedOut => summary.timed_out += 1,
            InvocationStatus::Interrupted => summary.interrupted += 1,
        }
    }

    summary.core_counts = cores.into_iter().collect();
    summary
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
