//! Bounded-concurrency orchestrator for network simulator sweeps
//!
//! Renders one configuration file per experiment, runs the external
//! simulator once per experiment with at most `capacity` processes alive at
//! a time, and waits for every run before reporting.

pub mod config;
pub mod core;
pub mod error;
pub mod orchestrator;
pub mod services;
pub mod traits;

// Re-export commonly used types
pub use crate::core::{ConcurrencyLimiter, ConfigTemplate, JobOutcome, JobPhase, JobStatus, RenderError};
pub use config::RunConfig;
pub use error::{OrchestratorError, OrchestratorResult};
pub use orchestrator::{Orchestrator, RunSummary};
pub use traits::{
    ArtifactStore, MockArtifactStore, MockSimulatorLauncher, SimulatorExit, SimulatorInvocation, SimulatorLauncher,
};
