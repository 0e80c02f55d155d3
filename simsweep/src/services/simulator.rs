//! Real simulator launcher implementation
//!
//! Spawns the simulator binary with its stdout redirected into the result
//! artifact and waits for it to exit.

use async_trait::async_trait;
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{SimulatorExit, SimulatorInvocation, SimulatorLauncher};
use shared::job_debug;

/// Spawn attempts while the binary is still held open for writing elsewhere
const SPAWN_ATTEMPTS: u32 = 5;
const SPAWN_BACKOFF: Duration = Duration::from_millis(20);

/// Real process launcher implementation
pub struct RealSimulatorLauncher {
    /// Discard the simulator's stderr instead of forwarding it
    quiet_stderr: bool,
}

impl RealSimulatorLauncher {
    /// Create launcher forwarding simulator stderr to ours
    pub fn new() -> Self {
        Self { quiet_stderr: false }
    }

    /// Configure stderr handling (fluent API)
    pub fn with_quiet_stderr(mut self, quiet_stderr: bool) -> Self {
        self.quiet_stderr = quiet_stderr;
        self
    }

    fn command(&self, invocation: &SimulatorInvocation, stdout: std::fs::File) -> Command {
        let mut cmd = Command::new(&invocation.binary);
        cmd.args(invocation.args());

        let stderr = if self.quiet_stderr {
            Stdio::null()
        } else {
            Stdio::inherit()
        };
        cmd.stdin(Stdio::null()).stdout(Stdio::from(stdout)).stderr(stderr);

        // An aborted run must not leave simulators behind
        cmd.kill_on_drop(true);
        cmd
    }

    /// Spawn, retrying while exec reports the binary as busy
    ///
    /// A freshly written binary can briefly fail with `ETXTBSY` when another
    /// thread forked while its write handle was open.
    async fn spawn(
        &self,
        experiment: &str,
        invocation: &SimulatorInvocation,
        stdout: &std::fs::File,
    ) -> io::Result<Child> {
        let mut attempt = 1;
        loop {
            let spawned = self.command(invocation, stdout.try_clone()?).spawn();
            match spawned {
                Err(err) if err.kind() == io::ErrorKind::ExecutableFileBusy && attempt < SPAWN_ATTEMPTS => {
                    job_debug!(experiment, "⏳ Simulator binary busy, retrying spawn ({}/{})", attempt, SPAWN_ATTEMPTS);
                    tokio::time::sleep(SPAWN_BACKOFF * attempt).await;
                    attempt += 1;
                }
                spawned => return spawned,
            }
        }
    }
}

impl Default for RealSimulatorLauncher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SimulatorLauncher for RealSimulatorLauncher {
    async fn launch(
        &self,
        experiment: &str,
        invocation: &SimulatorInvocation,
        stdout: std::fs::File,
    ) -> OrchestratorResult<SimulatorExit> {
        let mut child = self
            .spawn(experiment, invocation, &stdout)
            .await
            .map_err(|source| OrchestratorError::ProcessSpawnFailure {
                binary: invocation.binary.display().to_string(),
                source,
            })?;
        // The child holds its own copy of the result handle
        drop(stdout);

        job_debug!(
            experiment,
            "🏭 Spawned simulator (PID: {}) with {}",
            child.id().unwrap_or(0),
            invocation.config_path.display()
        );

        let status = child.wait().await?;
        let exit = SimulatorExit::from(status);

        job_debug!(experiment, "🛑 Simulator exited: {:?}", exit.code);
        Ok(exit)
    }
}
