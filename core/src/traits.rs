//! Process seams used by the driver
//!
//! The driver only ever talks to the outside world through these two traits.
//! Shell-backed implementations live in [`crate::process`]; tests substitute
//! recording mocks.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::DriverResult;
use crate::record::{Invocation, InvocationStatus};

/// Runs one benchmark invocation to completion
#[async_trait]
pub trait Launcher: Send + Sync {
    /// Launcher identifier for logs
    fn name(&self) -> &str;

    /// Spawn the invocation, redirect its output, and wait for it to exit
    ///
    /// An `Err` means the process never ran (files could not be opened, spawn
    /// failed). A process that ran and failed is reported through the status.
    async fn launch(
        &self,
        invocation: &Invocation,
        timeout: Option<Duration>,
    ) -> DriverResult<InvocationStatus>;
}

/// Changes the number of cores available to later processes
#[async_trait]
pub trait CoreActivator: Send + Sync {
    /// Activate `cores` processors and wait for the helper to return
    async fn activate(&self, cores: usize) -> DriverResult<()>;
}
