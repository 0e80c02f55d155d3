//! Run configuration

use std::path::PathBuf;

use crate::core::limiter::host_parallelism;
use crate::error::{OrchestratorError, OrchestratorResult};

/// Settings shared by every job of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Path of the simulator binary
    pub binary: PathBuf,
    /// Simulator behaviour mode, passed as the first argument
    pub experiment_type: i32,
    /// Maximum number of simulator processes running at once
    pub capacity: usize,
}

impl RunConfig {
    /// Create a config with capacity set to the host's available parallelism
    pub fn new(binary: impl Into<PathBuf>, experiment_type: i32) -> Self {
        Self {
            binary: binary.into(),
            experiment_type,
            capacity: host_parallelism(),
        }
    }

    /// Override capacity (fluent API)
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Configure experiment type (fluent API)
    pub fn with_experiment_type(mut self, experiment_type: i32) -> Self {
        self.experiment_type = experiment_type;
        self
    }

    pub fn validate(&self) -> OrchestratorResult<()> {
        if self.binary.as_os_str().is_empty() {
            return Err(OrchestratorError::config("simulator binary path is empty"));
        }
        if self.capacity == 0 {
            return Err(OrchestratorError::config("capacity must be at least 1"));
        }
        Ok(())
    }
}
