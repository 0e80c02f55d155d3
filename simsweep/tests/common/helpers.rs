//! Test helpers and builder patterns for orchestrator tests
//!
//! This module provides helper functions, an instrumented in-process
//! launcher and a builder to reduce test boilerplate.

use async_trait::async_trait;
use simsweep::services::{RealArtifactStore, RealSimulatorLauncher};
use simsweep::{
    ConfigTemplate, Orchestrator, OrchestratorResult, RunConfig, SimulatorExit, SimulatorInvocation, SimulatorLauncher,
};
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::fixtures::TestFixtures;

/// Counters shared between a [`CountingLauncher`] and the test
#[derive(Default)]
pub struct LaunchStats {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    launched: Mutex<Vec<String>>,
}

impl LaunchStats {
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn launched(&self) -> Vec<String> {
        let mut launched = self.launched.lock().unwrap().clone();
        launched.sort();
        launched
    }
}

/// In-process simulator stand-in
///
/// Writes the config path to stdout like an echo stub, holds the slot for
/// `delay`, and records how many launches overlapped.
pub struct CountingLauncher {
    delay: Duration,
    failing: HashSet<String>,
    stats: Arc<LaunchStats>,
}

impl CountingLauncher {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failing: HashSet::new(),
            stats: Arc::new(LaunchStats::default()),
        }
    }

    /// Make the named experiment exit with status 1
    pub fn failing(mut self, experiment: &str) -> Self {
        self.failing.insert(experiment.to_string());
        self
    }

    pub fn stats(&self) -> Arc<LaunchStats> {
        Arc::clone(&self.stats)
    }
}

#[async_trait]
impl SimulatorLauncher for CountingLauncher {
    async fn launch(
        &self,
        experiment: &str,
        invocation: &SimulatorInvocation,
        mut stdout: std::fs::File,
    ) -> OrchestratorResult<SimulatorExit> {
        let now = self.stats.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.peak.fetch_max(now, Ordering::SeqCst);

        writeln!(stdout, "{}", invocation.config_path.display())?;
        tokio::time::sleep(self.delay).await;

        self.stats.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.stats.launched.lock().unwrap().push(experiment.to_string());

        if self.failing.contains(experiment) {
            Ok(SimulatorExit::failure(1))
        } else {
            Ok(SimulatorExit::success())
        }
    }
}

/// Builder for orchestrators with sensible test defaults
pub struct OrchestratorBuilder {
    binary: PathBuf,
    experiment_type: i32,
    capacity: usize,
    base_dir: PathBuf,
}

impl OrchestratorBuilder {
    pub fn new(base_dir: &Path) -> Self {
        Self {
            binary: PathBuf::from("/opt/simulator"),
            experiment_type: TestFixtures::EXPERIMENT_TYPE,
            capacity: 1,
            base_dir: base_dir.to_path_buf(),
        }
    }

    pub fn with_binary(mut self, binary: PathBuf) -> Self {
        self.binary = binary;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_experiment_type(mut self, experiment_type: i32) -> Self {
        self.experiment_type = experiment_type;
        self
    }

    fn config(&self) -> RunConfig {
        RunConfig::new(self.binary.clone(), self.experiment_type).with_capacity(self.capacity)
    }

    /// Real store and real process launcher
    pub fn build(self) -> Orchestrator<RealArtifactStore, RealSimulatorLauncher> {
        Orchestrator::new(
            self.config(),
            RealArtifactStore::with_base_dir(&self.base_dir),
            RealSimulatorLauncher::new().with_quiet_stderr(true),
        )
        .unwrap()
    }

    /// Real store with a custom launcher
    pub fn build_with<L: SimulatorLauncher + 'static>(self, launcher: L) -> Orchestrator<RealArtifactStore, L> {
        Orchestrator::new(self.config(), RealArtifactStore::with_base_dir(&self.base_dir), launcher).unwrap()
    }
}

/// Helper functions for common test operations
pub struct TestHelpers;

impl TestHelpers {
    pub fn template() -> ConfigTemplate {
        ConfigTemplate::parse(TestFixtures::TEMPLATE).unwrap()
    }

    /// Write an executable shell script standing in for the simulator
    #[cfg(unix)]
    pub fn stub_binary(dir: &Path, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("simulator");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Sorted file names in a directory
    pub fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Expected artifact names for a set of experiment names
    pub fn expected_artifacts<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut expected: Vec<String> = names
            .into_iter()
            .flat_map(|name| [format!("conf_{name}.txt"), format!("results_{name}.txt")])
            .collect();
        expected.sort();
        expected
    }
}
