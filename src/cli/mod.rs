//! CLI argument parsing and command dispatch

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use savina_driver_core::config::{DEFAULT_CORES, DEFAULT_RUNS};
use savina_driver_core::{
    Driver, DriverBuilder, DriverConfig, DriverEvent, RunOutcome, RunParameters,
};
use tokio::sync::mpsc;

/// savina-driver - run actor benchmarks across core counts
#[derive(Parser, Debug)]
#[command(name = "savina-driver")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON file overriding paths, commands and timing
    #[arg(long, global = true, env = "SAVINA_DRIVER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory receiving akka_results/ and caf_results/
    #[arg(long, global = true)]
    pub results_root: Option<PathBuf>,

    /// Kill a benchmark after this many seconds (default: wait forever)
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Write driver_summary.json and driver_summary.csv into this directory
    #[arg(long, global = true)]
    pub summary_dir: Option<PathBuf>,

    /// Print the invocation plan without running anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Sweep core counts, running the JVM and native variant of every benchmark
    Sweep {
        /// Iterations per benchmark
        #[arg(short, long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        /// Pause after core activation, in milliseconds
        #[arg(long)]
        settle_ms: Option<u64>,
    },
    /// Run the native variants at a single core count
    Fixed {
        /// Iterations per benchmark
        #[arg(short, long, default_value_t = DEFAULT_RUNS)]
        runs: usize,

        /// Core count recorded in result file names
        #[arg(short, long, default_value_t = DEFAULT_CORES)]
        cores: usize,
    },
}

impl Cli {
    /// Merge defaults, the config file and command-line overrides
    pub fn resolve_config(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => DriverConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config from: {}", path.display()))?,
            None => DriverConfig::default(),
        };

        if let Some(root) = &self.results_root {
            config = config.with_results_root(root);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Some(Duration::from_secs(secs)));
        }
        if let Commands::Sweep {
            settle_ms: Some(ms),
            ..
        } = self.command
        {
            config = config.with_settle_delay(Duration::from_millis(ms));
        }

        Ok(config)
    }

    /// Builder for the selected driver, before progress wiring
    pub fn builder(&self) -> Result<DriverBuilder> {
        let config = self.resolve_config()?;
        let builder = match self.command {
            Commands::Sweep { runs, .. } => DriverBuilder::sweep(runs),
            Commands::Fixed { runs, cores } => DriverBuilder::fixed(RunParameters::new(cores, runs)),
        };
        Ok(builder.config(config))
    }

    /// Run the selected driver
    pub async fn run(&self) -> Result<()> {
        if self.dry_run {
            let driver = self.builder()?.build().context("Invalid driver configuration")?;
            print_plan(&driver);
            return Ok(());
        }

        let (tx, rx) = mpsc::channel(64);
        let driver = self
            .builder()?
            .events(tx)
            .build()
            .context("Invalid driver configuration")?;

        tracing::info!(
            schedule = ?driver.schedule(),
            benchmarks = driver.catalog().enabled_len(),
            "Starting savina-driver"
        );

        let total = driver.plan().len() as u64;
        let progress = tokio::spawn(track_progress(rx, total));

        let outcome = driver
            .run_with_signal_handling()
            .await
            .context("Benchmark run aborted")?;

        // closes the event channel so the progress task can finish
        drop(driver);
        progress.await.context("Progress task panicked")?;

        print_results(&outcome);

        if let Some(dir) = &self.summary_dir {
            let written = savina_driver_report::write_summaries(&outcome, dir)?;
            for path in written {
                println!("✓ Summary written to: {}", path.display());
            }
        }

        Ok(())
    }
}

async fn track_progress(mut rx: mpsc::Receiver<DriverEvent>, total: u64) {
    let pb = ProgressBar::new(total);
    if let Ok(style) = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
    {
        pb.set_style(style.progress_chars("#>-"));
    }

    while let Some(event) = rx.recv().await {
        match event {
            DriverEvent::CoresReady { cores } => pb.set_message(format!("{cores} cores")),
            DriverEvent::Finished(_) => pb.inc(1),
        }
    }

    pb.finish_with_message("done");
}

fn print_plan(driver: &Driver) {
    let mut current = None;
    for invocation in driver.plan() {
        if current != Some(invocation.cores) {
            current = Some(invocation.cores);
            if driver.schedule().activates_cores() {
                println!(
                    "# {} {} (then wait {} ms)",
                    driver.config().activate_command,
                    invocation.cores,
                    driver.config().settle_delay_ms
                );
            } else {
                println!("# {} cores", invocation.cores);
            }
        }
        println!(
            "{} > {} 2> {}",
            invocation.command,
            invocation.files.stdout.display(),
            invocation.files.stderr.display()
        );
    }
}

fn print_results(outcome: &RunOutcome) {
    let summary = outcome.summary();

    println!();
    println!("{}", "=".repeat(70));
    println!("   Run Summary");
    println!("{}", "=".repeat(70));
    println!("  Invocations:          {}", summary.total_invocations);
    println!(
        "  Succeeded:            {} ({:.1}%)",
        summary.succeeded,
        summary.success_rate() * 100.0
    );
    println!("  Non-zero exits:       {}", summary.nonzero_exits);
    println!("  Failed to run:        {}", summary.failed);
    println!("  Timed out:            {}", summary.timed_out);
    println!("  Interrupted:          {}", summary.interrupted);
    println!(
        "  Core counts:          {}",
        summary
            .core_counts
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    println!(
        "  Busy time:            {:.1} s",
        summary.busy_time.as_secs_f64()
    );
    println!(
        "  Elapsed:              {:.1} s",
        summary.elapsed.as_secs_f64()
    );

    let unsuccessful: Vec<_> = outcome
        .records
        .iter()
        .filter(|r| !r.status.is_success())
        .collect();
    if !unsuccessful.is_empty() {
        println!();
        println!("  Unsuccessful invocations:");
        for record in unsuccessful {
            println!(
                "    {}_{} @ {} cores: {}",
                record.id,
                record.name,
                record.cores,
                record.status.label()
            );
        }
    }
    println!("{}", "=".repeat(70));
}
