//! Per-experiment job pipeline
//!
//! A job renders its config, waits for a limiter slot, opens its result
//! artifact, runs the simulator to exit and gives the slot back. Any exit
//! status ends in [`JobPhase::Completed`]; the status is kept on the
//! [`JobOutcome`] for callers that want it.

use serde::Serialize;
use shared::{job_debug, job_error, job_info, job_warn, Experiment};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::config::RunConfig;
use crate::core::limiter::ConcurrencyLimiter;
use crate::core::template::{ConfigTemplate, RenderError};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::{ArtifactStore, SimulatorExit, SimulatorInvocation, SimulatorLauncher};

/// Lifecycle of a single job
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum JobPhase {
    Pending,
    Rendering,
    AwaitingSlot,
    Running,
    Completed,
}

/// How a job finished
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum JobStatus {
    /// The simulator ran; its exit status is recorded but never escalated
    Exited(SimulatorExit),
    /// The parameters did not fit the template, nothing was run
    Skipped(RenderError),
}

/// Completion record of one job
#[derive(Debug, Clone, Serialize)]
pub struct JobOutcome {
    pub experiment: String,
    pub config_path: Option<PathBuf>,
    pub result_path: Option<PathBuf>,
    pub status: JobStatus,
    pub elapsed: Duration,
}

impl JobOutcome {
    /// The simulator ran and exited with a failure status
    pub fn is_failure(&self) -> bool {
        matches!(self.status, JobStatus::Exited(exit) if !exit.success)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.status, JobStatus::Skipped(_))
    }
}

/// Runs one experiment through the job pipeline
pub struct JobRunner<S, L>
where
    S: ArtifactStore + 'static,
    L: SimulatorLauncher + 'static,
{
    experiment: Experiment,
    template: Arc<ConfigTemplate>,
    config: Arc<RunConfig>,
    store: Arc<S>,
    launcher: Arc<L>,
    limiter: ConcurrencyLimiter,
    phase: JobPhase,
}

impl<S, L> JobRunner<S, L>
where
    S: ArtifactStore + 'static,
    L: SimulatorLauncher + 'static,
{
    pub fn new(
        experiment: Experiment,
        template: Arc<ConfigTemplate>,
        config: Arc<RunConfig>,
        store: Arc<S>,
        launcher: Arc<L>,
        limiter: ConcurrencyLimiter,
    ) -> Self {
        Self {
            experiment,
            template,
            config,
            store,
            launcher,
            limiter,
            phase: JobPhase::Pending,
        }
    }

    pub fn phase(&self) -> JobPhase {
        self.phase
    }

    fn advance(&mut self, next: JobPhase) {
        debug_assert!(next > self.phase, "job phases only move forward");
        job_debug!(self.experiment.name(), "{:?} -> {:?}", self.phase, next);
        self.phase = next;
    }

    /// Run the job to completion
    ///
    /// A template mismatch is reported as a skipped outcome. Spawn and
    /// artifact failures are returned as errors; the limiter slot is
    /// released on every path.
    pub async fn run(mut self) -> OrchestratorResult<JobOutcome> {
        let started = Instant::now();
        let name = self.experiment.name().to_string();

        self.advance(JobPhase::Rendering);
        let contents = match self.template.render_experiment(&self.experiment) {
            Ok(contents) => contents,
            Err(OrchestratorError::TemplateMismatch { source, .. }) => {
                job_warn!(name, "⚠️ Skipping experiment, template mismatch: {}", source);
                self.advance(JobPhase::Completed);
                return Ok(JobOutcome {
                    experiment: name,
                    config_path: None,
                    result_path: None,
                    status: JobStatus::Skipped(source),
                    elapsed: started.elapsed(),
                });
            }
            Err(other) => return Err(other),
        };
        let config_path = self.store.write_config(&name, &contents).await?;

        self.advance(JobPhase::AwaitingSlot);
        let slot = self.limiter.acquire().await?;
        let (result_path, stdout) = self.store.create_result(&name).await?;

        self.advance(JobPhase::Running);
        let invocation = SimulatorInvocation {
            binary: self.config.binary.clone(),
            experiment_type: self.config.experiment_type,
            config_path: config_path.clone(),
        };
        let launched = self.launcher.launch(&name, &invocation, stdout).await;
        slot.release();
        let exit = launched.inspect_err(|err| {
            job_error!(name, "❌ Simulator launch failed: {}", err);
        })?;

        if exit.success {
            job_info!(name, "✅ Simulator finished, output in {}", result_path.display());
        } else {
            job_warn!(
                name,
                "⚠️ Simulator exited with status {:?}, see {}",
                exit.code,
                result_path.display()
            );
        }

        self.advance(JobPhase::Completed);
        Ok(JobOutcome {
            experiment: name,
            config_path: Some(config_path),
            result_path: Some(result_path),
            status: JobStatus::Exited(exit),
            elapsed: started.elapsed(),
        })
    }
}
