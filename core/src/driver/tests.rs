//! Tests for the Driver module

use super::builder::DriverBuilder;
use super::executor::{Driver, DriverEvent};
use super::summary::summarize_records;
use crate::catalog::{Benchmark, Catalog, Runtime};
use crate::config::{DriverConfig, RunParameters};
use crate::error::{DriverError, DriverResult};
use crate::record::{Invocation, InvocationRecord, InvocationStatus};
use crate::sweep::{CoreSchedule, CoreSweep};
use crate::traits::{CoreActivator, Launcher};

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;

// ============================================================================
// Shared event log
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum Step {
    Activate(usize),
    Launch { name: String, cores: usize, runs: usize },
}

type Log = Arc<Mutex<Vec<(Instant, Step)>>>;

fn new_log() -> Log {
    Arc::new(Mutex::new(Vec::new()))
}

fn launches(log: &Log) -> Vec<(String, usize, usize)> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|(_, step)| match step {
            Step::Launch { name, cores, runs } => Some((name.clone(), *cores, *runs)),
            _ => None,
        })
        .collect()
}

// ============================================================================
// Mock Launcher
// ============================================================================

struct MockLauncher {
    log: Log,
    delay: Option<Duration>,
    exit_codes: HashMap<String, i32>,
    spawn_failures: HashSet<String>,
}

impl MockLauncher {
    fn new(log: Log) -> Self {
        Self {
            log,
            delay: None,
            exit_codes: HashMap::new(),
            spawn_failures: HashSet::new(),
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn with_exit_code(mut self, qualified_name: &str, code: i32) -> Self {
        self.exit_codes.insert(qualified_name.to_string(), code);
        self
    }

    fn with_spawn_failure(mut self, qualified_name: &str) -> Self {
        self.spawn_failures.insert(qualified_name.to_string());
        self
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    fn name(&self) -> &str {
        "mock"
    }

    async fn launch(
        &self,
        invocation: &Invocation,
        _timeout: Option<Duration>,
    ) -> DriverResult<InvocationStatus> {
        let name = invocation.benchmark.qualified_name();
        self.log.lock().unwrap().push((
            Instant::now(),
            Step::Launch {
                name: name.clone(),
                cores: invocation.cores,
                runs: invocation.runs,
            },
        ));

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.spawn_failures.contains(&name) {
            return Err(DriverError::launch(format!("cannot spawn {name}")));
        }

        let code = self.exit_codes.get(&name).copied().unwrap_or(0);
        Ok(InvocationStatus::Exited { code })
    }
}

// ============================================================================
// Mock CoreActivator
// ============================================================================

struct MockActivator {
    log: Log,
    fail: bool,
}

impl MockActivator {
    fn new(log: Log) -> Self {
        Self { log, fail: false }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

#[async_trait]
impl CoreActivator for MockActivator {
    async fn activate(&self, cores: usize) -> DriverResult<()> {
        self.log
            .lock()
            .unwrap()
            .push((Instant::now(), Step::Activate(cores)));
        if self.fail {
            return Err(DriverError::activation("helper missing"));
        }
        Ok(())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn config_in(root: &Path) -> DriverConfig {
    DriverConfig::default().with_results_root(root)
}

fn small_sweep_config(root: &Path) -> DriverConfig {
    let mut config = config_in(root);
    config.sweep = CoreSweep::new(4, 4, 13);
    config
}

fn sweep_driver(root: &Path, log: &Log) -> Driver {
    DriverBuilder::sweep(10)
        .config(small_sweep_config(root))
        .launcher(Arc::new(MockLauncher::new(log.clone())))
        .activator(Arc::new(MockActivator::new(log.clone())))
        .build()
        .unwrap()
}

// ============================================================================
// Builder tests
// ============================================================================

#[test]
fn test_builder_requires_schedule() {
    let result = DriverBuilder::new().build();
    assert!(matches!(result, Err(DriverError::Config(_))));
}

#[test]
fn test_builder_rejects_zero_runs() {
    let result = DriverBuilder::fixed(RunParameters::new(4, 0)).build();
    assert!(result.is_err());
}

#[test]
fn test_builder_rejects_zero_cores() {
    let result = DriverBuilder::fixed(RunParameters::new(0, 10)).build();
    assert!(result.is_err());
}

#[test]
fn test_builder_rejects_empty_catalog() {
    let catalog = Catalog::new(vec![Benchmark::native("22", "piprecision").disabled("broken")]);
    let result = DriverBuilder::fixed(RunParameters::default())
        .catalog(catalog)
        .build();
    assert!(result.is_err());
}

#[test]
fn test_sweep_builder_uses_config_range() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let driver = sweep_driver(dir.path(), &log);
    assert_eq!(driver.schedule(), CoreSchedule::Sweep(CoreSweep::new(4, 4, 13)));
}

#[test]
fn test_fixed_builder_defaults() {
    let driver = DriverBuilder::fixed(RunParameters::default()).build().unwrap();
    assert_eq!(driver.schedule(), CoreSchedule::Fixed(4));
    assert_eq!(driver.catalog().runtimes(), vec![Runtime::Native]);
    assert!(driver.plan().iter().all(|inv| inv.runs == 10 && inv.cores == 4));
}

// ============================================================================
// Plan tests
// ============================================================================

#[test]
fn test_default_sweep_plan_size() {
    let driver = DriverBuilder::sweep(10).build().unwrap();
    let plan = driver.plan();
    assert_eq!(plan.len(), 32 * Catalog::sweep().enabled_len());

    let unique: HashSet<_> = plan.iter().map(|inv| inv.files.stdout.clone()).collect();
    assert_eq!(unique.len(), plan.len());
}

#[test]
fn test_plan_skips_disabled_entries() {
    let driver = DriverBuilder::sweep(10).build().unwrap();
    assert!(driver
        .plan()
        .iter()
        .all(|inv| inv.benchmark.is_enabled() && inv.benchmark.id != "22"));
}

#[test]
fn test_plan_routes_results_by_runtime() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let driver = sweep_driver(dir.path(), &log);
    let plan = driver.invocations_for(8);

    let native = &plan[0];
    assert_eq!(native.benchmark.runtime, Runtime::Native);
    assert_eq!(
        native.files.stdout,
        dir.path().join("caf_results").join("caf_01_pingpong_008.out")
    );

    let jvm = &plan[1];
    assert_eq!(jvm.benchmark.runtime, Runtime::Jvm);
    assert_eq!(
        jvm.files.stderr,
        dir.path()
            .join("akka_results")
            .join("akka_01_pingpong.PingPongAkkaActorBenchmark_008.err")
    );
}

// ============================================================================
// Run tests
// ============================================================================

#[tokio::test]
async fn test_fixed_run_executes_each_enabled_entry_once() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let driver = DriverBuilder::fixed(RunParameters::default())
        .config(config_in(dir.path()))
        .launcher(Arc::new(MockLauncher::new(log.clone())))
        .build()
        .unwrap();

    let records = driver.run().await.unwrap().records;

    let expected: Vec<_> = Catalog::native()
        .enabled()
        .map(|b| b.qualified_name())
        .collect();
    let launched: Vec<_> = launches(&log).into_iter().map(|(name, _, _)| name).collect();
    assert_eq!(launched, expected);
    assert_eq!(records.len(), 35);
    assert!(records.iter().all(|r| r.cores == 4 && r.runs == 10));

    // no activation in fixed mode
    assert!(log
        .lock()
        .unwrap()
        .iter()
        .all(|(_, step)| !matches!(step, Step::Activate(_))));

    // only the native results directory is needed
    assert!(dir.path().join("caf_results").is_dir());
    assert!(!dir.path().join("akka_results").exists());
}

#[tokio::test(start_paused = true)]
async fn test_sweep_activates_and_settles_before_benchmarks() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let driver = sweep_driver(dir.path(), &log);

    let records = driver.run().await.unwrap().records;
    let per_core = Catalog::sweep().enabled_len();
    assert_eq!(records.len(), 3 * per_core);

    let steps = log.lock().unwrap().clone();
    let mut current: Option<(usize, Instant)> = None;
    let mut activations = Vec::new();
    for (at, step) in steps {
        match step {
            Step::Activate(cores) => {
                activations.push(cores);
                current = Some((cores, at));
            }
            Step::Launch { cores, .. } => {
                let (active, activated_at) = current.expect("benchmark before any activation");
                assert_eq!(cores, active);
                assert!(at.duration_since(activated_at) >= Duration::from_secs(1));
            }
        }
    }
    assert_eq!(activations, vec![4, 8, 12]);
}

#[tokio::test(start_paused = true)]
async fn test_settle_delay_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let config = small_sweep_config(dir.path()).with_settle_delay(Duration::from_secs(30));
    let driver = DriverBuilder::sweep(10)
        .config(config)
        .catalog(Catalog::new(vec![Benchmark::native("01", "pingpong")]))
        .launcher(Arc::new(MockLauncher::new(log.clone())))
        .activator(Arc::new(MockActivator::new(log.clone())))
        .build()
        .unwrap();

    let start = Instant::now();
    let outcome = driver.run().await.unwrap();

    assert!(start.elapsed() >= Duration::from_secs(90));
    let steps = log.lock().unwrap().clone();
    assert_eq!(steps.len(), 6);
    assert!(steps[1].0.duration_since(steps[0].0) >= Duration::from_secs(30));

    // settling counts toward elapsed time but not busy time
    let summary = outcome.summary();
    assert!(summary.elapsed >= Duration::from_secs(90));
    assert!(summary.busy_time < Duration::from_secs(1));
}

#[tokio::test]
async fn test_failures_do_not_stop_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let launcher = MockLauncher::new(log.clone())
        .with_spawn_failure("03_fjthrput")
        .with_exit_code("05_threadring", 1);
    let driver = DriverBuilder::fixed(RunParameters::new(16, 3))
        .config(config_in(dir.path()))
        .launcher(Arc::new(launcher))
        .build()
        .unwrap();

    let records = driver.run().await.unwrap().records;
    assert_eq!(records.len(), 35);

    let by_name: HashMap<_, _> = records
        .iter()
        .map(|r| (format!("{}_{}", r.id, r.name), r.status.clone()))
        .collect();
    assert!(matches!(by_name["03_fjthrput"], InvocationStatus::Failed { .. }));
    assert_eq!(by_name["05_threadring"], InvocationStatus::Exited { code: 1 });
    assert!(by_name["30_bitonicsort"].is_success());

    let summary = summarize_records(&records);
    assert_eq!(summary.total_invocations, 35);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.nonzero_exits, 1);
    assert_eq!(summary.succeeded, 33);
    assert_eq!(summary.core_counts, vec![16]);
}

#[tokio::test(start_paused = true)]
async fn test_activation_failure_does_not_stop_the_sweep() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let driver = DriverBuilder::sweep(10)
        .config(small_sweep_config(dir.path()))
        .launcher(Arc::new(MockLauncher::new(log.clone())))
        .activator(Arc::new(MockActivator::new(log.clone()).failing()))
        .build()
        .unwrap();

    let records = driver.run().await.unwrap().records;
    assert_eq!(records.len(), 3 * Catalog::sweep().enabled_len());
}

#[tokio::test]
async fn test_missing_results_root_is_created() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("fresh").join("run");
    let log = new_log();
    let driver = DriverBuilder::fixed(RunParameters::default())
        .config(config_in(&root))
        .launcher(Arc::new(MockLauncher::new(log)))
        .build()
        .unwrap();

    driver.run().await.unwrap();
    assert!(root.join("caf_results").is_dir());
}

#[tokio::test]
async fn test_events_are_emitted_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let (tx, mut rx) = mpsc::channel(128);
    let driver = DriverBuilder::fixed(RunParameters::new(8, 1))
        .config(config_in(dir.path()))
        .catalog(Catalog::new(vec![
            Benchmark::native("01", "pingpong"),
            Benchmark::native("02", "count"),
        ]))
        .launcher(Arc::new(MockLauncher::new(log)))
        .events(tx)
        .build()
        .unwrap();

    driver.run().await.unwrap();
    drop(driver);

    let mut events = Vec::new();
    while let Some(event) = rx.recv().await {
        events.push(event);
    }
    assert_eq!(events.len(), 3);
    assert!(matches!(events[0], DriverEvent::CoresReady { cores: 8 }));
    match (&events[1], &events[2]) {
        (DriverEvent::Finished(a), DriverEvent::Finished(b)) => {
            assert_eq!(a.name, "pingpong");
            assert_eq!(b.name, "count");
        }
        other => panic!("unexpected events: {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_running_benchmark() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let driver = Arc::new(
        DriverBuilder::fixed(RunParameters::default())
            .config(config_in(dir.path()))
            .launcher(Arc::new(
                MockLauncher::new(log.clone()).with_delay(Duration::from_secs(10)),
            ))
            .build()
            .unwrap(),
    );

    let stopper = Arc::clone(&driver);
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(25)).await;
        stopper.shutdown();
    });

    let records = driver.run().await.unwrap().records;

    assert_eq!(records.len(), 3);
    assert!(records[0].status.is_success());
    assert!(records[1].status.is_success());
    assert_eq!(records[2].status, InvocationStatus::Interrupted);
    assert_eq!(launches(&log).len(), 3);
}

#[tokio::test]
async fn test_shutdown_before_run_starts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let log = new_log();
    let driver = DriverBuilder::fixed(RunParameters::default())
        .config(config_in(dir.path()))
        .launcher(Arc::new(MockLauncher::new(log.clone())))
        .build()
        .unwrap();

    driver.shutdown();
    let records = driver.run().await.unwrap().records;
    assert!(records.is_empty());
    assert!(launches(&log).is_empty());
}

// ============================================================================
// End-to-end with the shell launcher
// ============================================================================

#[cfg(unix)]
#[tokio::test]
async fn test_shell_run_writes_result_pairs() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let bin = dir.path().join("bin");
    std::fs::create_dir(&bin).unwrap();
    for name in ["caf_01_pingpong", "caf_02_count"] {
        let path = bin.join(name);
        std::fs::write(&path, "#!/bin/sh\necho \"$0 $@\"\necho warmup 1>&2\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    let mut config = config_in(dir.path());
    config.native_bin_dir = bin;
    let driver = DriverBuilder::fixed(RunParameters::new(4, 7))
        .config(config)
        .catalog(Catalog::new(vec![
            Benchmark::native("01", "pingpong"),
            Benchmark::native("02", "count"),
            Benchmark::native("03", "fjthrput"),
        ]))
        .build()
        .unwrap();

    let records: Vec<InvocationRecord> = driver.run().await.unwrap().records;
    assert_eq!(records.len(), 3);

    let results = dir.path().join("caf_results");
    let out = std::fs::read_to_string(results.join("caf_01_pingpong_004.out")).unwrap();
    assert!(out.trim_end().ends_with("caf_01_pingpong --iterations=7"));
    let err = std::fs::read_to_string(results.join("caf_02_count_004.err")).unwrap();
    assert_eq!(err, "warmup\n");

    // missing executable: files exist, run carried on, shell reported 127
    assert!(results.join("caf_03_fjthrput_004.out").exists());
    assert_eq!(records[2].status, InvocationStatus::Exited { code: 127 });
}
