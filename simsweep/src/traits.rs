//! Trait definitions with mockall annotations for testing
//!
//! The orchestrator reaches the filesystem and the simulator binary only
//! through these traits, so runs can be exercised without touching either.

use serde::Serialize;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::OrchestratorResult;

/// One call of the external simulator: `<binary> <experiment_type> <config_path>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorInvocation {
    pub binary: PathBuf,
    pub experiment_type: i32,
    pub config_path: PathBuf,
}

impl SimulatorInvocation {
    /// Argument list passed to the binary, in order
    pub fn args(&self) -> Vec<OsString> {
        vec![
            OsString::from(self.experiment_type.to_string()),
            self.config_path.clone().into_os_string(),
        ]
    }
}

/// How a simulator process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulatorExit {
    /// Exit code, absent when the process was killed by a signal
    pub code: Option<i32>,
    pub success: bool,
}

impl SimulatorExit {
    pub fn success() -> Self {
        Self {
            code: Some(0),
            success: true,
        }
    }

    pub fn failure(code: i32) -> Self {
        Self {
            code: Some(code),
            success: false,
        }
    }
}

impl From<std::process::ExitStatus> for SimulatorExit {
    fn from(status: std::process::ExitStatus) -> Self {
        Self {
            code: status.code(),
            success: status.success(),
        }
    }
}

/// Artifact storage abstraction for dependency injection
///
/// Config and result artifacts are named from the experiment name, so each
/// experiment owns exactly one path of each kind.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ArtifactStore: Send + Sync {
    /// Path of the config artifact for an experiment
    fn config_path(&self, experiment: &str) -> PathBuf;

    /// Path of the result artifact for an experiment
    fn result_path(&self, experiment: &str) -> PathBuf;

    /// Write the rendered config, replacing any existing file
    ///
    /// # Returns
    /// The path the config was written to
    async fn write_config(&self, experiment: &str, contents: &str) -> OrchestratorResult<PathBuf>;

    /// Create (truncating) the result artifact and open it for writing
    ///
    /// # Returns
    /// The artifact path and a handle suitable for a child's stdout
    async fn create_result(&self, experiment: &str) -> OrchestratorResult<(PathBuf, std::fs::File)>;
}

/// Simulator process abstraction
///
/// Runs the external binary to completion with its stdout redirected into
/// the supplied file.
#[mockall::automock]
#[async_trait::async_trait]
pub trait SimulatorLauncher: Send + Sync {
    /// Spawn the simulator and wait for it to exit
    ///
    /// # Parameters
    /// - `experiment`: Experiment name, for logging
    /// - `invocation`: Binary and arguments
    /// - `stdout`: Open result artifact receiving the process's stdout
    ///
    /// # Returns
    /// The exit status. A non-zero exit is not an error; failing to start
    /// the binary is.
    async fn launch(
        &self,
        experiment: &str,
        invocation: &SimulatorInvocation,
        stdout: std::fs::File,
    ) -> OrchestratorResult<SimulatorExit>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_trait_instantiation() {
        let _mock_store = MockArtifactStore::new();
        let _mock_launcher = MockSimulatorLauncher::new();
    }

    #[test]
    fn test_invocation_args_order() {
        let invocation = SimulatorInvocation {
            binary: PathBuf::from("../simulator"),
            experiment_type: 1,
            config_path: PathBuf::from("conf_a.txt"),
        };
        assert_eq!(
            invocation.args(),
            vec![OsString::from("1"), OsString::from("conf_a.txt")]
        );
    }

    #[test]
    fn test_exit_constructors() {
        assert!(SimulatorExit::success().success);
        assert_eq!(SimulatorExit::failure(3).code, Some(3));
        assert!(!SimulatorExit::failure(3).success);
    }
}
