//! Driver for sequential benchmark runs
//!
//! The Driver walks a core schedule and, at each core count, runs every
//! enabled catalog entry to completion before starting the next:
//! - activating the core count through the helper (sweep only)
//! - waiting the settle delay before the first benchmark
//! - redirecting each run to its own `.out`/`.err` pair
//! - recording the outcome and carrying on regardless of it
//!
//! # Example
//!
//! ```ignore
//! use savina_driver_core::{DriverBuilder, RunParameters};
//!
//! let driver = DriverBuilder::fixed(RunParameters::new(4, 10)).build()?;
//! let outcome = driver.run_with_signal_handling().await?;
//! ```

mod builder;
mod executor;
mod summary;

pub use builder::DriverBuilder;
pub use executor::{Driver, DriverEvent};
pub use summary::{summarize_records, RunOutcome, SweepSummary};

#[cfg(test)]
mod tests;
