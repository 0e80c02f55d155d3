//! Shared types for the simulator sweep system
//!
//! Contains the experiment data model exchanged with sweep generators and the
//! logging utilities used by every crate in the workspace.

pub mod errors;
pub mod logging;
pub mod types;

pub use errors::*;
pub use types::*;
