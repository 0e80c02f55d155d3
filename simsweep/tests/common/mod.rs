//! Common test utilities and fixtures
//!
//! Shared between the unit and integration suites.

#![allow(dead_code)]

pub mod fixtures;
pub mod helpers;

pub use fixtures::TestFixtures;
pub use helpers::{CountingLauncher, LaunchStats, OrchestratorBuilder, TestHelpers};
