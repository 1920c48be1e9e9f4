//! Static benchmark catalogs
//!
//! A catalog is an ordered list of benchmark descriptors. Entries that are
//! known to be broken or too slow stay in the list with a disabled reason so
//! the numbering stays visible, but they are never handed to a launcher.

use serde::{Deserialize, Serialize};

/// Runtime a benchmark variant is built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Runtime {
    /// JVM actor library, launched by fully-qualified class name
    Jvm,
    /// Native actor runtime, launched as a `caf_*` executable
    Native,
}

impl Runtime {
    /// Prefix used for result file names
    pub fn result_prefix(&self) -> &'static str {
        match self {
            Runtime::Jvm => "akka",
            Runtime::Native => "caf",
        }
    }
}

impl std::fmt::Display for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Runtime::Jvm => write!(f, "jvm"),
            Runtime::Native => write!(f, "native"),
        }
    }
}

/// A single catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Benchmark {
    /// Runtime this variant targets
    pub runtime: Runtime,
    /// Two-digit benchmark number, e.g. `"01"`
    pub id: &'static str,
    /// JVM: class path below the benchmark package; native: variant name
    pub name: &'static str,
    /// Why the entry is skipped, if it is
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<&'static str>,
}

impl Benchmark {
    /// An enabled JVM entry
    pub const fn jvm(id: &'static str, name: &'static str) -> Self {
        Self {
            runtime: Runtime::Jvm,
            id,
            name,
            disabled: None,
        }
    }

    /// An enabled native entry
    pub const fn native(id: &'static str, name: &'static str) -> Self {
        Self {
            runtime: Runtime::Native,
            id,
            name,
            disabled: None,
        }
    }

    /// Mark the entry as disabled
    pub const fn disabled(self, reason: &'static str) -> Self {
        Self {
            disabled: Some(reason),
            ..self
        }
    }

    /// Whether the entry may be invoked
    pub fn is_enabled(&self) -> bool {
        self.disabled.is_none()
    }

    /// `<id>_<name>`, the native executable suffix
    pub fn qualified_name(&self) -> String {
        format!("{}_{}", self.id, self.name)
    }
}

const SLOW_VARIANT: &str = "slow variant, superseded by request_await_infinite";
const PIPRECISION: &str = "piprecision does not terminate reliably";

/// Native-first pairs, mirrored on the JVM where a port exists
const SWEEP: &[Benchmark] = &[
    Benchmark::native("01", "pingpong"),
    Benchmark::jvm("01", "pingpong.PingPongAkkaActorBenchmark"),
    Benchmark::native("02", "count"),
    Benchmark::jvm("02", "count.CountingAkkaActorBenchmark"),
    Benchmark::native("03", "fjthrput"),
    Benchmark::jvm("03", "fjthrput.ThroughputAkkaActorBenchmark"),
    Benchmark::native("04", "fjcreate"),
    Benchmark::jvm("04", "fjcreate.ForkJoinAkkaActorBenchmark"),
    Benchmark::native("05", "threadring"),
    Benchmark::jvm("05", "threadring.ThreadRingAkkaActorBenchmark"),
    Benchmark::native("06", "chameneos"),
    Benchmark::jvm("06", "chameneos.ChameneosAkkaActorBenchmark"),
    Benchmark::native("07", "big"),
    Benchmark::jvm("07", "big.BigAkkaActorBenchmark"),
    Benchmark::native("08", "concdict"),
    Benchmark::jvm("08", "concdict.DictionaryAkkaActorBenchmark"),
    Benchmark::native("09", "concsll"),
    Benchmark::jvm("09", "concsll.SortedListAkkaActorBenchmark"),
    Benchmark::native("10", "bndbuffer"),
    Benchmark::jvm("10", "bndbuffer.ProdConsAkkaActorBenchmark"),
    Benchmark::native("11", "philosopher"),
    Benchmark::jvm("11", "philosopher.PhilosopherAkkaActorBenchmark"),
    Benchmark::native("12", "barber"),
    Benchmark::jvm("12", "barber.SleepingBarberAkkaActorBenchmark"),
    Benchmark::native("13", "cigsmok"),
    Benchmark::jvm("13", "cigsmok.CigaretteSmokerAkkaActorBenchmark"),
    Benchmark::native("14", "logmap_become_unbecome_fast").disabled(SLOW_VARIANT),
    Benchmark::jvm("14", "logmap.LogisticMapAkkaAwaitActorBenchmark"),
    Benchmark::native("14", "logmap_become_unbecome_slow").disabled(SLOW_VARIANT),
    Benchmark::native("14", "logmap_request_await_high_timeout").disabled(SLOW_VARIANT),
    Benchmark::native("14", "logmap_request_await_infinite"),
    Benchmark::native("15", "banking_become_unbecome_fast").disabled(SLOW_VARIANT),
    Benchmark::jvm("15", "banking.BankingAkkaAwaitActorBenchmark"),
    Benchmark::native("15", "banking_become_unbecome_slow").disabled(SLOW_VARIANT),
    Benchmark::native("15", "banking_request_await_high_timeout").disabled(SLOW_VARIANT),
    Benchmark::native("15", "banking_request_await_infinite"),
    Benchmark::native("15", "banking_request_then_high_timeout").disabled(SLOW_VARIANT),
    Benchmark::native("15", "banking_request_then_infinite").disabled(SLOW_VARIANT),
    Benchmark::native("16", "radixsort"),
    Benchmark::jvm("16", "radixsort.RadixSortAkkaActorBenchmark"),
    Benchmark::native("18", "sieve"),
    Benchmark::jvm("18", "sieve.SieveAkkaActorBenchmark"),
    Benchmark::native("19", "uct"),
    Benchmark::jvm("19", "utc.UctScalazRelaxAkkaActorBenchmark"),
    Benchmark::native("20", "facloc"),
    Benchmark::jvm("20", "facloc.FacilityLocationAkkaActorBenchmark"),
    Benchmark::native("21", "trapezoid"),
    Benchmark::jvm("21", "trapezoid.TrapezoidalAkkaActorBenchmark"),
    Benchmark::native("22", "piprecision").disabled(PIPRECISION),
    Benchmark::jvm("22", "piprecision.PiPrecisionAkkaActorBenchmark").disabled(PIPRECISION),
    Benchmark::native("23", "recmatmul"),
    Benchmark::jvm("23", "recmatmul.MatMulAkkaActorBenchmark"),
    Benchmark::native("24", "quicksort"),
    Benchmark::jvm("24", "quicksort.QuickSortAkkaActorBenchmark"),
    Benchmark::native("25", "apsp"),
    Benchmark::jvm("25", "apsp.ApspAkkaActorBenchmark"),
    Benchmark::native("27", "astar"),
    Benchmark::jvm("26", "sor.SucOverRelaxAkkaActorBenchmark").disabled("no native port"),
    Benchmark::jvm("27", "astar.GuidedSearchAkkaActorBenchmark"),
    Benchmark::native("28", "nqueenk"),
    Benchmark::jvm("28", "nqueenk.NQueensAkkaActorBenchmark"),
    Benchmark::native("29", "fib"),
    Benchmark::jvm("29", "fib.FibonacciAkkaActorBenchmark"),
    Benchmark::native("30", "bitonicsort"),
    Benchmark::jvm("30", "bitonicsort.BitonicSortAkkaActorBenchmark"),
    Benchmark::jvm("17", "filterbank.FilterBankAkkaActorBenchmark").disabled("no native port"),
];

/// Every native variant, used by the fixed-count driver
const NATIVE: &[Benchmark] = &[
    Benchmark::native("01", "pingpong"),
    Benchmark::native("02", "count"),
    Benchmark::native("03", "fjthrput"),
    Benchmark::native("04", "fjcreate"),
    Benchmark::native("05", "threadring"),
    Benchmark::native("06", "chameneos"),
    Benchmark::native("07", "big"),
    Benchmark::native("08", "concdict"),
    Benchmark::native("09", "concsll"),
    Benchmark::native("10", "bndbuffer"),
    Benchmark::native("11", "philosopher"),
    Benchmark::native("12", "barber"),
    Benchmark::native("13", "cigsmok"),
    Benchmark::native("14", "logmap_become_unbecome_fast"),
    Benchmark::native("14", "logmap_become_unbecome_slow"),
    Benchmark::native("14", "logmap_request_await_high_timeout"),
    Benchmark::native("14", "logmap_request_await_infinite"),
    Benchmark::native("15", "banking_become_unbecome_fast"),
    Benchmark::native("15", "banking_become_unbecome_slow"),
    Benchmark::native("15", "banking_request_await_high_timeout"),
    Benchmark::native("15", "banking_request_await_infinite"),
    Benchmark::native("15", "banking_request_then_high_timeout"),
    Benchmark::native("15", "banking_request_then_infinite"),
    Benchmark::native("16", "radixsort"),
    Benchmark::native("18", "sieve"),
    Benchmark::native("19", "uct"),
    Benchmark::native("20", "facloc"),
    Benchmark::native("21", "trapezoid"),
    Benchmark::native("22", "piprecision").disabled(PIPRECISION),
    Benchmark::native("23", "recmatmul"),
    Benchmark::native("24", "quicksort"),
    Benchmark::native("25", "apsp"),
    Benchmark::native("27", "astar"),
    Benchmark::native("28", "nqueenk"),
    Benchmark::native("29", "fib"),
    Benchmark::native("30", "bitonicsort"),
];

/// Ordered list of benchmark descriptors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<Benchmark>,
}

impl Catalog {
    /// Build a catalog from an explicit list
    pub fn new(entries: Vec<Benchmark>) -> Self {
        Self { entries }
    }

    /// Interleaved native/JVM catalog driven by the sweep
    pub fn sweep() -> Self {
        Self::new(SWEEP.to_vec())
    }

    /// Native-only catalog driven at a fixed core count
    pub fn native() -> Self {
        Self::new(NATIVE.to_vec())
    }

    /// Keep only the entries for one runtime
    pub fn only_runtime(self, runtime: Runtime) -> Self {
        Self::new(
            self.entries
                .into_iter()
                .filter(|b| b.runtime == runtime)
                .collect(),
        )
    }

    /// All entries, disabled ones included
    pub fn entries(&self) -> &[Benchmark] {
        &self.entries
    }

    /// Entries that will actually run, in list order
    pub fn enabled(&self) -> impl Iterator<Item = &Benchmark> {
        self.entries.iter().filter(|b| b.is_enabled())
    }

    /// Number of entries that will run
    pub fn enabled_len(&self) -> usize {
        self.enabled().count()
    }

    /// Runtimes with at least one enabled entry
    pub fn runtimes(&self) -> Vec<Runtime> {
        let mut runtimes = Vec::new();
        for b in self.enabled() {
            if !runtimes.contains(&b.runtime) {
                runtimes.push(b.runtime);
            }
        }
        runtimes
    }
}
