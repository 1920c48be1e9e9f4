//! Shell command lines for benchmark invocations

use crate::catalog::{Benchmark, Runtime};
use crate::config::DriverConfig;

/// A command line handed to `sh -c`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkCommand {
    line: String,
}

impl BenchmarkCommand {
    /// Wrap a raw command line
    pub fn new(line: impl Into<String>) -> Self {
        Self { line: line.into() }
    }

    /// Command line for one catalog entry
    ///
    /// JVM entries run `java -cp <jar> <prefix>.<class> -iter <runs>`; native
    /// entries run `<bin_dir>/caf_<id>_<name> --iterations=<runs>`.
    pub fn for_benchmark(benchmark: &Benchmark, runs: usize, config: &DriverConfig) -> Self {
        let line = match benchmark.runtime {
            Runtime::Jvm => format!(
                "{} -cp {} {}.{} -iter {}",
                config.java_command,
                config.jar_path.display(),
                config.jvm_class_prefix,
                benchmark.name,
                runs
            ),
            Runtime::Native => format!(
                "{}/caf_{} --iterations={}",
                config.native_bin_dir.display(),
                benchmark.qualified_name(),
                runs
            ),
        };
        Self { line }
    }

    /// Command line for the core-activation helper
    pub fn activation(config: &DriverConfig, cores: usize) -> Self {
        Self {
            line: format!("{} {}", config.activate_command, cores),
        }
    }

    /// The full command line
    pub fn as_str(&self) -> &str {
        &self.line
    }
}

impl std::fmt::Display for BenchmarkCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.line)
    }
}
