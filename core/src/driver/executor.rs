//! Driver execution logic

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{broadcast, mpsc};
use tokio::time::Instant;

use crate::catalog::Catalog;
use crate::command::BenchmarkCommand;
use crate::config::DriverConfig;
use crate::error::DriverResult;
use crate::naming::{ensure_dir, ResultFiles};
use crate::record::{Invocation, InvocationRecord, InvocationStatus};
use crate::sweep::CoreSchedule;
use crate::traits::{CoreActivator, Launcher};

use super::summary::RunOutcome;

/// Progress notifications sent while a run is in flight
#[derive(Debug, Clone)]
pub enum DriverEvent {
    /// The activation helper returned and the settle delay elapsed
    CoresReady {
        /// Core count now active
        cores: usize,
    },
    /// One invocation finished
    Finished(InvocationRecord),
}

/// Runs a catalog over a core schedule, one process at a time
pub struct Driver {
    /// Paths, commands and timing
    pub(crate) config: DriverConfig,

    /// Benchmarks to run at each core count
    pub(crate) catalog: Catalog,

    /// Core counts to visit
    pub(crate) schedule: CoreSchedule,

    /// Iterations passed to every benchmark
    pub(crate) runs: usize,

    /// Spawns benchmark processes
    pub(crate) launcher: Arc<dyn Launcher>,

    /// Changes the active core count (sweep only)
    pub(crate) activator: Option<Arc<dyn CoreActivator>>,

    /// Optional progress sink
    pub(crate) events_tx: Option<mpsc::Sender<DriverEvent>>,

    /// Shutdown signal sender
    pub(crate) shutdown_tx: broadcast::Sender<()>,

    /// Set once shutdown was requested
    pub(crate) stopping: Arc<AtomicBool>,
}

impl Driver {
    /// Create a new driver
    ///
    /// Use `DriverBuilder` for a more ergonomic construction.
    pub fn new(
        config: DriverConfig,
        catalog: Catalog,
        schedule: CoreSchedule,
        runs: usize,
        launcher: Arc<dyn Launcher>,
        activator: Option<Arc<dyn CoreActivator>>,
    ) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            config,
            catalog,
            schedule,
            runs,
            launcher,
            activator,
            events_tx: None,
            shutdown_tx,
            stopping: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Attach a progress sink
    pub fn with_events(mut self, tx: mpsc::Sender<DriverEvent>) -> Self {
        self.events_tx = Some(tx);
        self
    }

    /// Get the driver configuration
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Get the catalog being driven
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Get the core schedule
    pub fn schedule(&self) -> CoreSchedule {
        self.schedule
    }

    /// Request a stop; the running process is killed and nothing new starts
    pub fn shutdown(&self) {
        self.stopping.store(true, Ordering::SeqCst);
        let _ = self.shutdown_tx.send(());
    }

    fn is_stopping(&self) -> bool {
        self.stopping.load(Ordering::SeqCst)
    }

    /// Invocations for one core count, in catalog order, disabled entries skipped
    pub fn invocations_for(&self, cores: usize) -> Vec<Invocation> {
        self.catalog
            .enabled()
            .map(|benchmark| Invocation {
                benchmark: *benchmark,
                cores,
                runs: self.runs,
                command: BenchmarkCommand::for_benchmark(benchmark, self.runs, &self.config),
                files: ResultFiles::for_benchmark(
                    self.config.results_dir(benchmark.runtime),
                    benchmark,
                    cores,
                ),
            })
            .collect()
    }

    /// Every invocation of the run, in execution order
    pub fn plan(&self) -> Vec<Invocation> {
        self.schedule
            .core_counts()
            .into_iter()
            .flat_map(|cores| self.invocations_for(cores))
            .collect()
    }

    /// Create the results directory of every runtime in the catalog
    pub fn prepare(&self) -> DriverResult<()> {
        for runtime in self.catalog.runtimes() {
            ensure_dir(self.config.results_dir(runtime))?;
        }
        Ok(())
    }

    async fn emit(&self, event: DriverEvent) {
        if let Some(tx) = &self.events_tx {
            // receiver gone just means nobody is watching
            let _ = tx.send(event).await;
        }
    }

    /// Run the whole schedule
    ///
    /// Only directory preparation errors abort the run. Individual invocation
    /// failures are logged and recorded, and the driver moves on.
    pub async fn run(&self) -> DriverResult<RunOutcome> {
        let start = Instant::now();
        let mut shutdown_rx = self.shutdown_tx.subscribe();
        let timeout = self.config.timeout();
        let core_counts = self.schedule.core_counts();
        let mut records =
            Vec::with_capacity(core_counts.len() * self.catalog.enabled_len());

        self.prepare()?;

        tracing::info!(
            launcher = self.launcher.name(),
            core_counts = core_counts.len(),
            benchmarks = self.catalog.enabled_len(),
            runs = self.runs,
            "Starting run"
        );

        'schedule: for cores in core_counts {
            if self.is_stopping() {
                break;
            }

            if self.schedule.activates_cores() {
                if let Some(activator) = &self.activator {
                    tracing::info!(cores, "Activating cores");
                    tokio::select! {
                        biased;
                        _ = shutdown_rx.recv() => break 'schedule,
                        result = activator.activate(cores) => {
                            if let Err(e) = result {
                                tracing::warn!(cores, error = %e, "Core activation failed, continuing");
                            }
                        }
                    }

                    let delay = self.config.settle_delay();
                    tracing::debug!(cores, delay_ms = delay.as_millis() as u64, "Settling");
                    tokio::select! {
                        biased;
                        _ = shutdown_rx.recv() => break 'schedule,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
            self.emit(DriverEvent::CoresReady { cores }).await;

            for invocation in self.invocations_for(cores) {
                if self.is_stopping() {
                    break 'schedule;
                }

                let started_at = Utc::now();
                let t0 = Instant::now();
                tracing::debug!(command = %invocation.command, "Launching");

                let mut interrupted = false;
                let status = tokio::select! {
                    biased;
                    _ = shutdown_rx.recv() => {
                        interrupted = true;
                        InvocationStatus::Interrupted
                    }
                    result = self.launcher.launch(&invocation, timeout) => match result {
                        Ok(status) => status,
                        Err(e) => {
                            tracing::error!(
                                benchmark = %invocation.benchmark.qualified_name(),
                                cores,
                                error = %e,
                                "Benchmark did not run, continuing"
                            );
                            InvocationStatus::Failed { message: e.to_string() }
                        }
                    },
                };

                let record = InvocationRecord::new(&invocation, started_at, t0.elapsed(), status);
                match &record.status {
                    InvocationStatus::Exited { code: 0 } => tracing::info!(
                        runtime = %record.runtime,
                        benchmark = %invocation.benchmark.qualified_name(),
                        cores,
                        duration_ms = record.duration.as_millis() as u64,
                        "Benchmark completed"
                    ),
                    InvocationStatus::Failed { .. } => {}
                    other => tracing::warn!(
                        runtime = %record.runtime,
                        benchmark = %invocation.benchmark.qualified_name(),
                        cores,
                        status = %other.label(),
                        "Benchmark did not exit cleanly"
                    ),
                }

                self.emit(DriverEvent::Finished(record.clone())).await;
                records.push(record);

                if interrupted {
                    tracing::info!("Shutdown requested, stopping run");
                    break 'schedule;
                }
            }
        }

        let outcome = RunOutcome {
            records,
            elapsed: start.elapsed(),
        };
        let summary = outcome.summary();
        tracing::info!(
            elapsed_secs = summary.elapsed.as_secs_f64(),
            invocations = summary.total_invocations,
            succeeded = summary.succeeded,
            unsuccessful = summary.unsuccessful(),
            "Run finished"
        );

        Ok(outcome)
    }

    /// Run with Ctrl+C signal handling
    ///
    /// Ctrl+C kills the running benchmark and returns what was recorded so far.
    pub async fn run_with_signal_handling(&self) -> DriverResult<RunOutcome> {
        let shutdown_tx = self.shutdown_tx.clone();
        let stopping = Arc::clone(&self.stopping);

        let signal_handle = tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("Received Ctrl+C, stopping after killing the running benchmark...");
                    stopping.store(true, Ordering::SeqCst);
                    let _ = shutdown_tx.send(());
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to listen for Ctrl+C");
                }
            }
        });

        let result = self.run().await;

        signal_handle.abort();

        result
    }
}

impl std::fmt::Debug for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("config", &self.config)
            .field("schedule", &self.schedule)
            .field("runs", &self.runs)
            .field("benchmarks", &self.catalog.enabled_len())
            .field("launcher", &self.launcher.name())
            .finish()
    }
}
