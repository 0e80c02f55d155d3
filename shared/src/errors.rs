//! Shared error types for the experiment sweep system

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SharedError {
    #[error("Invalid experiment name '{name}': {reason}")]
    InvalidExperimentName { name: String, reason: String },

    #[error("Duplicate experiment name: {name}")]
    DuplicateExperiment { name: String },

    #[error("Deserialization failed: {message}")]
    DeserializationError { message: String },

    #[error("Failed to read {path}: {source}")]
    ReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl From<serde_json::Error> for SharedError {
    fn from(err: serde_json::Error) -> Self {
        SharedError::DeserializationError {
            message: err.to_string(),
        }
    }
}

pub type SharedResult<T> = Result<T, SharedError>;
