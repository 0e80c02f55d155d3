//! Service implementations
//!
//! Real implementations of the service traits. These are the production
//! implementations that touch the filesystem and spawn processes.

pub mod artifact_store;
pub mod simulator;

#[cfg(test)]
mod tests;

// Re-export all service implementations
pub use artifact_store::RealArtifactStore;
pub use simulator::RealSimulatorLauncher;
