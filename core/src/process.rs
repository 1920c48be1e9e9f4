//! Shell-backed launcher and core activator
//!
//! Every command runs in its own process group. `sh -c` may fork the
//! benchmark instead of exec'ing it, so killing the shell alone would leave
//! the benchmark running; the whole group is killed instead.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use nix::errno::Errno;
use nix::sys::signal::{killpg, Signal};
use nix::unistd::Pid;
use tokio::process::{Child, Command};

use crate::command::BenchmarkCommand;
use crate::config::DriverConfig;
use crate::error::{DriverError, DriverResult};
use crate::record::{Invocation, InvocationStatus};
use crate::traits::{CoreActivator, Launcher};

/// Build a `sh -c <line>` command leading a new process group
fn shell(line: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(line).process_group(0).kill_on_drop(true);
    cmd
}

/// Kills a spawned shell's process group unless disarmed
///
/// Dropping the guard (a timed-out or shutdown-cancelled launch) takes down
/// the benchmark together with the shell that started it.
struct ProcessGroup {
    pgid: Option<Pid>,
}

impl ProcessGroup {
    fn of(child: &Child) -> Self {
        Self {
            pgid: child.id().map(|id| Pid::from_raw(id as i32)),
        }
    }

    /// SIGKILL every process in the group
    fn kill(&mut self) -> DriverResult<()> {
        match self.pgid.take() {
            // ESRCH: everything already exited
            Some(pgid) => match killpg(pgid, Signal::SIGKILL) {
                Ok(()) | Err(Errno::ESRCH) => Ok(()),
                Err(e) => Err(DriverError::Io(e.into())),
            },
            None => Ok(()),
        }
    }

    /// The shell exited on its own; leave the group alone
    fn disarm(&mut self) {
        self.pgid = None;
    }
}

impl Drop for ProcessGroup {
    fn drop(&mut self) {
        if let Err(e) = self.kill() {
            tracing::warn!(error = %e, "Failed to kill benchmark process group");
        }
    }
}

/// Runs invocations through `sh -c` with output redirected to result files
#[derive(Debug, Clone, Default)]
pub struct ShellLauncher;

impl ShellLauncher {
    /// Create a shell launcher
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Launcher for ShellLauncher {
    fn name(&self) -> &str {
        "shell"
    }

    async fn launch(
        &self,
        invocation: &Invocation,
        timeout: Option<Duration>,
    ) -> DriverResult<InvocationStatus> {
        let (out, err) = invocation.files.create().map_err(|e| {
            DriverError::launch(format!(
                "cannot open {}: {}",
                invocation.files.stdout.display(),
                e
            ))
        })?;

        let mut child = shell(invocation.command.as_str())
            .stdin(Stdio::null())
            .stdout(Stdio::from(out))
            .stderr(Stdio::from(err))
            .spawn()
            .map_err(|e| DriverError::launch(format!("cannot spawn `{}`: {}", invocation.command, e)))?;
        let mut group = ProcessGroup::of(&child);

        let status = match timeout {
            None => child.wait().await?,
            Some(limit) => {
                let waited = tokio::time::timeout(limit, child.wait()).await;
                match waited {
                    Ok(status) => status?,
                    Err(_) => {
                        tracing::warn!(
                            command = %invocation.command,
                            timeout_secs = limit.as_secs_f64(),
                            "Benchmark timed out, killing it"
                        );
                        group.kill()?;
                        child.wait().await?;
                        return Ok(InvocationStatus::TimedOut);
                    }
                }
            }
        };
        group.disarm();

        Ok(status.into())
    }
}

/// Runs `<activate_command> <cores>` through the shell
#[derive(Debug, Clone)]
pub struct ShellCoreActivator {
    config: DriverConfig,
}

impl ShellCoreActivator {
    /// Create an activator using the configured helper command
    pub fn new(config: DriverConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl CoreActivator for ShellCoreActivator {
    async fn activate(&self, cores: usize) -> DriverResult<()> {
        let command = BenchmarkCommand::activation(&self.config, cores);
        let mut child = shell(command.as_str())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| DriverError::activation(format!("cannot spawn `{}`: {}", command, e)))?;
        let mut group = ProcessGroup::of(&child);

        let status = child.wait().await?;
        group.disarm();

        if !status.success() {
            return Err(DriverError::activation(format!(
                "`{}` exited with {}",
                command, status
            )));
        }
        Ok(())
    }
}
