//! savina-driver-core: sequential driver for actor benchmark sweeps
//!
//! This crate provides everything the `savina-driver` binary needs to run
//! externally built actor benchmarks, including:
//!
//! - The static benchmark catalogs (JVM and native variants)
//! - Result file naming with zero-padded core counts
//! - Shell command construction and process launching
//! - Core-count schedules and the core-activation step
//! - The sequential Driver and its run summary
//! - Error handling

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod naming;
pub mod process;
pub mod record;
pub mod sweep;
pub mod traits;

pub use catalog::{Benchmark, Catalog, Runtime};
pub use command::BenchmarkCommand;
pub use config::{ConfigError, DriverConfig, RunParameters};
pub use driver::{
    summarize_records, Driver, DriverBuilder, DriverEvent, RunOutcome, SweepSummary,
};
pub use error::*;
pub use naming::{pad_cores, ResultFiles};
pub use process::{ShellCoreActivator, ShellLauncher};
pub use record::{Invocation, InvocationRecord, InvocationStatus};
pub use sweep::{CoreSchedule, CoreSweep};
pub use traits::{CoreActivator, Launcher};
