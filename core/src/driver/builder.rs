//! Builder pattern for Driver construction

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::catalog::Catalog;
use crate::config::{DriverConfig, RunParameters, DEFAULT_RUNS};
use crate::error::{DriverError, DriverResult};
use crate::process::{ShellCoreActivator, ShellLauncher};
use crate::sweep::CoreSchedule;
use crate::traits::{CoreActivator, Launcher};

use super::executor::{Driver, DriverEvent};

/// Builder for creating a Driver with proper configuration
///
/// # Example
///
/// ```ignore
/// let driver = DriverBuilder::sweep(10)
///     .config(config)
///     .build()?;
///
/// let outcome = driver.run_with_signal_handling().await?;
/// ```
pub struct DriverBuilder {
    config: DriverConfig,
    catalog: Catalog,
    schedule: Option<CoreSchedule>,
    runs: usize,
    launcher: Option<Arc<dyn Launcher>>,
    activator: Option<Arc<dyn CoreActivator>>,
    events_tx: Option<mpsc::Sender<DriverEvent>>,
}

impl DriverBuilder {
    /// Create a builder with default configuration and no schedule
    pub fn new() -> Self {
        Self {
            config: DriverConfig::default(),
            catalog: Catalog::sweep(),
            schedule: None,
            runs: DEFAULT_RUNS,
            launcher: None,
            activator: None,
            events_tx: None,
        }
    }

    /// Sweep driver: interleaved catalog over the configured core range
    pub fn sweep(runs: usize) -> Self {
        let mut builder = Self::new().runs(runs);
        builder.schedule = Some(CoreSchedule::Sweep(builder.config.sweep));
        builder
    }

    /// Fixed-count driver: native catalog at one core count
    pub fn fixed(params: RunParameters) -> Self {
        Self::new()
            .catalog(Catalog::native())
            .schedule(CoreSchedule::Fixed(params.cores))
            .runs(params.runs)
    }

    /// Set the full configuration
    ///
    /// A sweep schedule picks up the configuration's core range.
    pub fn config(mut self, config: DriverConfig) -> Self {
        if let Some(CoreSchedule::Sweep(_)) = self.schedule {
            self.schedule = Some(CoreSchedule::Sweep(config.sweep));
        }
        self.config = config;
        self
    }

    /// Set the catalog
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Set the core schedule
    pub fn schedule(mut self, schedule: CoreSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }

    /// Set the iteration count
    pub fn runs(mut self, runs: usize) -> Self {
        self.runs = runs;
        self
    }

    /// Set the launcher (defaults to `ShellLauncher`)
    pub fn launcher(mut self, launcher: Arc<dyn Launcher>) -> Self {
        self.launcher = Some(launcher);
        self
    }

    /// Set the core activator (defaults to `ShellCoreActivator` for sweeps)
    pub fn activator(mut self, activator: Arc<dyn CoreActivator>) -> Self {
        self.activator = Some(activator);
        self
    }

    /// Attach a progress sink
    pub fn events(mut self, tx: mpsc::Sender<DriverEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Build the driver
    ///
    /// # Errors
    ///
    /// Returns an error if no schedule was set or validation fails.
    pub fn build(self) -> DriverResult<Driver> {
        let schedule = self
            .schedule
            .ok_or_else(|| DriverError::missing_config("schedule"))?;

        self.config
            .validate()
            .map_err(|e| DriverError::config(e.to_string()))?;

        let cores = match schedule {
            CoreSchedule::Fixed(cores) => cores,
            CoreSchedule::Sweep(sweep) => sweep.start,
        };
        RunParameters::new(cores, self.runs)
            .validate()
            .map_err(|e| DriverError::config(e.to_string()))?;

        if self.catalog.enabled_len() == 0 {
            return Err(DriverError::config("catalog has no enabled benchmarks"));
        }

        let launcher = self
            .launcher
            .unwrap_or_else(|| Arc::new(ShellLauncher::new()));

        let activator = match (schedule.activates_cores(), self.activator) {
            (true, Some(activator)) => Some(activator),
            (true, None) => {
                Some(Arc::new(ShellCoreActivator::new(self.config.clone())) as Arc<dyn CoreActivator>)
            }
            (false, _) => None,
        };

        let mut driver = Driver::new(
            self.config,
            self.catalog,
            schedule,
            self.runs,
            launcher,
            activator,
        );
        if let Some(tx) = self.events_tx {
            driver = driver.with_events(tx);
        }
        Ok(driver)
    }
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
