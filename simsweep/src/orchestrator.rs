//! Main orchestrator implementation
//!
//! Fans out one job per experiment, lets the concurrency limiter decide how
//! many simulators actually run, and joins every job before reporting.

use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use uuid::Uuid;

use shared::{logging, ExperimentSet};

use crate::{
    config::RunConfig,
    core::{ConcurrencyLimiter, ConfigTemplate, JobOutcome, JobRunner},
    error::{OrchestratorError, OrchestratorResult},
    traits::{ArtifactStore, SimulatorLauncher},
};

/// Result of a completed run
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    /// Number of experiments processed, equal to the experiment set size
    pub processed: usize,
    /// One record per experiment, sorted by name
    pub outcomes: Vec<JobOutcome>,
    /// Highest number of simulators that held a slot at once
    pub peak_concurrency: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// Jobs whose simulator exited with a failure status
    pub fn failed(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_failure())
    }

    /// Jobs skipped because their parameters did not fit the template
    pub fn skipped(&self) -> impl Iterator<Item = &JobOutcome> {
        self.outcomes.iter().filter(|outcome| outcome.is_skipped())
    }

    /// Human-readable completion line
    pub fn report(&self) -> String {
        format!("finished {} experiments", self.processed)
    }
}

/// Bounded-concurrency experiment orchestrator
pub struct Orchestrator<S, L>
where
    S: ArtifactStore + 'static,
    L: SimulatorLauncher + 'static,
{
    config: Arc<RunConfig>,
    store: Arc<S>,
    launcher: Arc<L>,
    limiter: ConcurrencyLimiter,
}

impl<S, L> Orchestrator<S, L>
where
    S: ArtifactStore + 'static,
    L: SimulatorLauncher + 'static,
{
    /// Create new orchestrator with injected dependencies
    pub fn new(config: RunConfig, store: S, launcher: L) -> OrchestratorResult<Self> {
        config.validate()?;
        let limiter = ConcurrencyLimiter::new(config.capacity)?;

        Ok(Self {
            config: Arc::new(config),
            store: Arc::new(store),
            launcher: Arc::new(launcher),
            limiter,
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// The shared gate, exposed for instrumentation
    pub fn limiter(&self) -> &ConcurrencyLimiter {
        &self.limiter
    }

    /// Run every experiment and wait for all of them
    ///
    /// Template mismatches and simulator failures are recorded per job. A
    /// spawn or artifact failure in any job aborts the whole run and is
    /// returned, with no summary.
    pub async fn run(&self, experiments: &ExperimentSet, template: &ConfigTemplate) -> OrchestratorResult<RunSummary> {
        let run_id = Uuid::new_v4();
        let started = Instant::now();
        let total = experiments.len();

        logging::log_startup(
            &run_id,
            &format!(
                "{} experiments with {} ({} slots)",
                total,
                self.config.binary.display(),
                self.limiter.capacity()
            ),
        );

        let template = Arc::new(template.clone());
        let mut jobs = JoinSet::new();
        for experiment in experiments {
            let runner = JobRunner::new(
                experiment.clone(),
                Arc::clone(&template),
                Arc::clone(&self.config),
                Arc::clone(&self.store),
                Arc::clone(&self.launcher),
                self.limiter.clone(),
            );
            jobs.spawn(runner.run());
        }

        let mut outcomes = Vec::with_capacity(total);
        while let Some(joined) = jobs.join_next().await {
            let result = joined
                .map_err(|err| OrchestratorError::JobAborted {
                    message: err.to_string(),
                })
                .and_then(|job| job);

            match result {
                Ok(outcome) => {
                    logging::log_progress(
                        &run_id,
                        "Completed",
                        &format!("{} ({}/{})", outcome.experiment, outcomes.len() + 1, total),
                    );
                    outcomes.push(outcome);
                }
                Err(err) => {
                    logging::log_error(&run_id, "Experiment run", &err);
                    jobs.abort_all();
                    // Let aborted jobs drop their children and slots before returning
                    while jobs.join_next().await.is_some() {}
                    return Err(err);
                }
            }
        }

        outcomes.sort_by(|a, b| a.experiment.cmp(&b.experiment));
        let summary = RunSummary {
            run_id,
            processed: outcomes.len(),
            outcomes,
            peak_concurrency: self.limiter.peak(),
            elapsed: started.elapsed(),
        };

        let failed = summary.failed().count();
        if failed > 0 {
            logging::log_warning(&run_id, &format!("{failed} simulator runs exited with a failure status"));
        }
        logging::log_success(&run_id, &summary.report());
        Ok(summary)
    }
}
