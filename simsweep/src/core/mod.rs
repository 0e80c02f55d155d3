//! Core orchestration components
//!
//! Pure logic with no direct I/O: template rendering, the concurrency gate
//! and the per-experiment job pipeline.

pub mod job;
pub mod limiter;
pub mod template;

pub use job::{JobOutcome, JobPhase, JobRunner, JobStatus};
pub use limiter::{ConcurrencyLimiter, SlotPermit};
pub use template::{ConfigTemplate, RenderError};
