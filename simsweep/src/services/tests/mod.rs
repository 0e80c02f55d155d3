//! Service-specific tests
//!
//! Each service has its own test file. Process tests use small shell
//! scripts as stand-in simulators and only run on unix.


// Common test utilities for services
pub mod common {
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tokio::time::timeout;

    /// Standard timeout for process operations in tests
    pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Helper to run async operations with timeout
    pub async fn with_timeout<T, F>(future: F) -> Result<T, tokio::time::error::Elapsed>
    where
        F: std::future::Future<Output = T>,
    {
        timeout(TEST_TIMEOUT, future).await
    }

    /// Write an executable shell script standing in for the simulator
    #[cfg(unix)]
    pub fn write_stub(dir: &Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write stub script");
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod stub script");
        path
    }
}
