//! Real artifact store implementation
//!
//! Writes config artifacts and opens result artifacts in a base directory,
//! naming both from the experiment name.

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::traits::ArtifactStore;
use shared::job_debug;

const CONFIG_PREFIX: &str = "conf_";
const RESULT_PREFIX: &str = "results_";
const ARTIFACT_EXTENSION: &str = "txt";

/// Real file system implementation
pub struct RealArtifactStore {
    /// Directory holding all artifacts
    base_dir: PathBuf,
}

impl RealArtifactStore {
    /// Create store writing into the current directory
    pub fn new() -> Self {
        Self {
            base_dir: PathBuf::from("."),
        }
    }

    /// Create with custom base directory
    pub fn with_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn artifact_path(&self, prefix: &str, experiment: &str) -> PathBuf {
        self.base_dir
            .join(format!("{prefix}{experiment}.{ARTIFACT_EXTENSION}"))
    }

    async fn ensure_base_dir(&self) -> OrchestratorResult<()> {
        fs::create_dir_all(&self.base_dir)
            .await
            .map_err(|e| OrchestratorError::artifact("create directory", &self.base_dir, e))
    }
}

impl Default for RealArtifactStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArtifactStore for RealArtifactStore {
    fn config_path(&self, experiment: &str) -> PathBuf {
        self.artifact_path(CONFIG_PREFIX, experiment)
    }

    fn result_path(&self, experiment: &str) -> PathBuf {
        self.artifact_path(RESULT_PREFIX, experiment)
    }

    async fn write_config(&self, experiment: &str, contents: &str) -> OrchestratorResult<PathBuf> {
        self.ensure_base_dir().await?;

        let path = self.config_path(experiment);
        fs::write(&path, contents)
            .await
            .map_err(|e| OrchestratorError::artifact("write config", &path, e))?;

        job_debug!(experiment, "📝 Wrote config {}", path.display());
        Ok(path)
    }

    async fn create_result(&self, experiment: &str) -> OrchestratorResult<(PathBuf, std::fs::File)> {
        self.ensure_base_dir().await?;

        let path = self.result_path(experiment);
        let file = fs::File::create(&path)
            .await
            .map_err(|e| OrchestratorError::artifact("create result", &path, e))?;

        job_debug!(experiment, "📂 Opened result {}", path.display());
        Ok((path, file.into_std().await))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_names() {
        let store = RealArtifactStore::with_base_dir("/tmp/sweep");
        assert_eq!(store.config_path("a"), PathBuf::from("/tmp/sweep/conf_a.txt"));
        assert_eq!(store.result_path("a"), PathBuf::from("/tmp/sweep/results_a.txt"));
    }

    #[test]
    fn test_default_is_current_directory() {
        let store = RealArtifactStore::default();
        assert_eq!(store.config_path("pHost_dctcp_0.5"), PathBuf::from("./conf_pHost_dctcp_0.5.txt"));
    }
}
