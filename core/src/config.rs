//! Driver configuration types
//!
//! Defaults reproduce the layout the benchmark builds expect: the JVM jar in
//! `../target`, native executables in `../build/bin`, and results written to
//! `./akka_results` and `./caf_results` relative to the working directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::Runtime;
use crate::error::DriverResult;
use crate::sweep::CoreSweep;

/// Default iteration count passed to every benchmark
pub const DEFAULT_RUNS: usize = 10;

/// Default core count for the fixed-count driver
pub const DEFAULT_CORES: usize = 4;

/// Default pause after core activation
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 1000;

/// Paths, commands and timing shared by both drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Java launcher
    pub java_command: String,

    /// Jar holding the JVM benchmarks and their dependencies
    pub jar_path: PathBuf,

    /// Package the JVM benchmark class paths are relative to
    pub jvm_class_prefix: String,

    /// Directory holding the `caf_*` executables
    pub native_bin_dir: PathBuf,

    /// Results directory for JVM runs
    pub jvm_results_dir: PathBuf,

    /// Results directory for native runs
    pub native_results_dir: PathBuf,

    /// Helper that takes a core count as its only argument
    pub activate_command: String,

    /// Pause between activation and the first benchmark, in milliseconds
    pub settle_delay_ms: u64,

    /// Core counts visited by the sweep driver
    pub sweep: CoreSweep,

    /// Per-invocation timeout; `None` waits forever
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            java_command: "java".into(),
            jar_path: PathBuf::from("../target/savina-0.0.1-SNAPSHOT-jar-with-dependencies.jar"),
            jvm_class_prefix: "edu.rice.habanero.benchmarks".into(),
            native_bin_dir: PathBuf::from("../build/bin"),
            jvm_results_dir: PathBuf::from("./akka_results"),
            native_results_dir: PathBuf::from("./caf_results"),
            activate_command: "./activate_cores".into(),
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            sweep: CoreSweep::default(),
            timeout_secs: None,
        }
    }
}

impl DriverConfig {
    /// Load a JSON config file; absent keys keep their defaults
    pub fn from_json_file(path: &Path) -> DriverResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Set the settle delay
    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay_ms = delay.as_millis() as u64;
        self
    }

    /// Set the per-invocation timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_secs = timeout.map(|t| t.as_secs());
        self
    }

    /// Redirect both runtimes' results below a common root
    pub fn with_results_root(mut self, root: &Path) -> Self {
        self.jvm_results_dir = root.join("akka_results");
        self.native_results_dir = root.join("caf_results");
        self
    }

    /// Results directory for a runtime
    pub fn results_dir(&self, runtime: Runtime) -> &Path {
        match runtime {
            Runtime::Jvm => &self.jvm_results_dir,
            Runtime::Native => &self.native_results_dir,
        }
    }

    /// Settle delay as a duration
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Timeout as a duration
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sweep.step == 0 {
            return Err(ConfigError::InvalidSweep("step must be at least 1".into()));
        }
        if self.sweep.start == 0 {
            return Err(ConfigError::InvalidSweep(
                "start must be at least 1 core".into(),
            ));
        }
        if self.sweep.start >= self.sweep.end {
            return Err(ConfigError::InvalidSweep(format!(
                "start ({}) must be below end ({})",
                self.sweep.start, self.sweep.end
            )));
        }
        if self.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidTimeout(
                "timeout must be positive".into(),
            ));
        }
        if self.activate_command.trim().is_empty() {
            return Err(ConfigError::MissingCommand("activate_command".into()));
        }
        if self.java_command.trim().is_empty() {
            return Err(ConfigError::MissingCommand("java_command".into()));
        }
        Ok(())
    }
}

/// Core count and iteration count for one pass over a catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunParameters {
    /// Active core count
    pub cores: usize,
    /// Iterations each benchmark performs internally
    pub runs: usize,
}

impl Default for RunParameters {
    fn default() -> Self {
        Self {
            cores: DEFAULT_CORES,
            runs: DEFAULT_RUNS,
        }
    }
}

impl RunParameters {
    /// Create run parameters
    pub fn new(cores: usize, runs: usize) -> Self {
        Self { cores, runs }
    }

    /// Validate the parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cores == 0 {
            return Err(ConfigError::InvalidCores(
                "core count must be at least 1".into(),
            ));
        }
        if self.runs == 0 {
            return Err(ConfigError::InvalidRuns(
                "run count must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Invalid core count
    #[error("Invalid cores: {0}")]
    InvalidCores(String),

    /// Invalid run count
    #[error("Invalid runs: {0}")]
    InvalidRuns(String),

    /// Invalid sweep bounds
    #[error("Invalid sweep: {0}")]
    InvalidSweep(String),

    /// Invalid timeout
    #[error("Invalid timeout: {0}")]
    InvalidTimeout(String),

    /// A required command is empty
    #[error("Missing command: {0}")]
    MissingCommand(String),
}
