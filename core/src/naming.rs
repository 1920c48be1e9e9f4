//! Result file naming
//!
//! Every invocation writes its standard output and standard error to a pair
//! of files named `<prefix>_<id>_<name>_<ccc>.out` / `.err`, where `ccc` is
//! the core count zero-padded to three digits.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::catalog::Benchmark;
use crate::error::{DriverError, DriverResult};

/// Width the core count is padded to
pub const CORE_PAD_WIDTH: usize = 3;

/// Zero-pad a core count: 4 -> "004", 45 -> "045", 132 -> "132"
pub fn pad_cores(cores: usize) -> String {
    format!("{:0width$}", cores, width = CORE_PAD_WIDTH)
}

/// Stdout/stderr paths for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultFiles {
    /// Redirect target for standard output
    pub stdout: PathBuf,
    /// Redirect target for standard error
    pub stderr: PathBuf,
}

impl ResultFiles {
    /// Derive the file pair from its naming components
    pub fn new(dir: &Path, prefix: &str, id: &str, name: &str, cores: usize) -> Self {
        let stem = format!("{}_{}_{}_{}", prefix, id, name, pad_cores(cores));
        Self {
            stdout: dir.join(format!("{stem}.out")),
            stderr: dir.join(format!("{stem}.err")),
        }
    }

    /// File pair for a catalog entry
    pub fn for_benchmark(dir: &Path, benchmark: &Benchmark, cores: usize) -> Self {
        Self::new(
            dir,
            benchmark.runtime.result_prefix(),
            benchmark.id,
            benchmark.name,
            cores,
        )
    }

    /// Create (or truncate) both files for writing
    pub fn create(&self) -> std::io::Result<(File, File)> {
        let out = File::create(&self.stdout)?;
        let err = File::create(&self.stderr)?;
        Ok((out, err))
    }
}

/// Create a results directory and its parents if missing
pub fn ensure_dir(dir: &Path) -> DriverResult<()> {
    std::fs::create_dir_all(dir).map_err(|source| DriverError::ResultsDir {
        path: dir.to_path_buf(),
        source,
    })
}
