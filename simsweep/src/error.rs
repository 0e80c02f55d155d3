//! Orchestrator-specific error types

use thiserror::Error;

use crate::core::template::RenderError;

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("Template mismatch for experiment '{experiment}': {source}")]
    TemplateMismatch {
        experiment: String,
        #[source]
        source: RenderError,
    },

    #[error("Invalid configuration template at byte {position}: {message}")]
    TemplateSyntax { position: usize, message: String },

    #[error("Failed to spawn simulator {binary}: {source}")]
    ProcessSpawnFailure {
        binary: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Artifact operation failed: {operation} on {path}: {source}")]
    ArtifactError {
        operation: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Job task aborted: {message}")]
    JobAborted { message: String },

    #[error("Concurrency limiter closed")]
    LimiterClosed,

    #[error("Configuration error: {field}")]
    ConfigurationError { field: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    pub fn config(field: impl Into<String>) -> Self {
        OrchestratorError::ConfigurationError { field: field.into() }
    }

    pub fn artifact(operation: &str, path: &std::path::Path, source: std::io::Error) -> Self {
        OrchestratorError::ArtifactError {
            operation: operation.to_string(),
            path: path.display().to_string(),
            source,
        }
    }
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
