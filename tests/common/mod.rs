//! Shared test utilities for govm integration tests.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// An isolated home directory with an sdk layout, handed to the govm
/// binary via the `HOME` environment variable.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("failed to create temp home"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn sdk_path(&self) -> PathBuf {
        self.dir.path().join("sdk")
    }

    pub fn version_root(&self, version: &str) -> PathBuf {
        self.sdk_path().join(version)
    }

    /// Create an installed-version directory (directory presence is the
    /// sole source of truth for "is X installed").
    pub fn install_version(&self, version: &str) -> PathBuf {
        let root = self.version_root(version);
        fs::create_dir_all(root.join("bin")).expect("failed to create version dir");
        root
    }

    /// Point the current symlink at a version, as a successful install
    /// would have.
    #[cfg(unix)]
    pub fn set_current(&self, version: &str) {
        std::os::unix::fs::symlink(self.version_root(version), self.sdk_path().join("go"))
            .expect("failed to create current symlink");
    }

    #[cfg(unix)]
    pub fn current_target(&self) -> Option<PathBuf> {
        fs::read_link(self.sdk_path().join("go")).ok()
    }
}
