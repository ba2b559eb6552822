//! SDK directory layout and the current-version pointer
//!
//! All installed toolchains live under `<home>/sdk/<canonical-version>`, and
//! a single symlink at `<home>/sdk/go` marks which one is current. Directory
//! existence is the sole source of truth for "is X installed" - there is no
//! manifest to get out of sync.
//!
//! The pointer is global mutable state, so every read and write of it goes
//! through [`Sdk`]. The mutation contract is narrow:
//!
//! - [`Sdk::set_current`] - replace the pointer (remove old, create new)
//! - [`Sdk::is_current`] - compare the pointer target to a version root
//! - [`Sdk::remove`] - delete an installed version, guarded by `is_current`
//!
//! `set_current` is two syscalls, not an atomic rename. A crash between
//! them leaves no pointer at all - recoverable (install anything to
//! recreate it) but user-visible. A write-then-rename swap would close the
//! window; the two-step form is kept because the window is tiny, the
//! failure is benign, and symlink-replace-by-rename is not portable to
//! Windows directory links.

use crate::core::GovmError;
use crate::utils::platform::get_home_dir;
use anyhow::Result;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::fs::symlink;
#[cfg(windows)]
use std::os::windows::fs::symlink_dir as symlink;

/// Name of the current-pointer symlink under the sdk root.
const CURRENT_LINK: &str = "go";

/// Owner of the `<home>/sdk` layout and the current-version pointer.
#[derive(Debug, Clone)]
pub struct Sdk {
    root: PathBuf,
}

impl Sdk {
    /// Open the sdk layout under the user's home directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn from_home() -> Result<Self> {
        Ok(Self::new(get_home_dir()?.join("sdk")))
    }

    /// Open an sdk layout rooted at an explicit directory (tests).
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The sdk root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Install directory for a canonical version.
    #[must_use]
    pub fn version_root(&self, version: &str) -> PathBuf {
        self.root.join(version)
    }

    /// Path of the current-pointer symlink.
    #[must_use]
    pub fn current_link(&self) -> PathBuf {
        self.root.join(CURRENT_LINK)
    }

    /// Expected toolchain entrypoint for a version
    /// (`<root>/<version>/bin/go`).
    #[must_use]
    pub fn entrypoint(&self, version: &str) -> PathBuf {
        let name = if cfg!(windows) { "go.exe" } else { "go" };
        self.version_root(version).join("bin").join(name)
    }

    /// Point the current-pointer at `version`'s install directory.
    ///
    /// Removes any existing pointer first (a missing pointer is not an
    /// error), then creates the symlink. Always a symbolic indirection,
    /// never a copy, so switching is O(1).
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::Io`] if removing the old link or creating the
    /// new one fails.
    pub fn set_current(&self, version: &str) -> Result<(), GovmError> {
        let link = self.current_link();
        match remove_link(&link) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        tracing::debug!(version, link = %link.display(), "switching current version");
        symlink(self.version_root(version), &link)?;
        Ok(())
    }

    /// Whether the current-pointer resolves to `version`.
    ///
    /// A missing pointer means no version is selected and yields `false`,
    /// not an error. Comparison is by path equality of the link target.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::Io`] for any read failure other than the
    /// pointer not existing.
    pub fn is_current(&self, version: &str) -> Result<bool, GovmError> {
        match fs::read_link(self.current_link()) {
            Ok(target) => Ok(target == self.version_root(version)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete an installed version's directory.
    ///
    /// Refuses to remove the version the current-pointer resolves to;
    /// switch to another version first. This guard is checked before any
    /// filesystem mutation, so a refused remove leaves both the directory
    /// and the pointer untouched. Removing a version that was never
    /// installed succeeds silently, like any recursive delete.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::CannotRemoveCurrent`] when `version` is the
    /// active version, or [`GovmError::Io`] if the recursive delete fails.
    pub fn remove(&self, version: &str) -> Result<(), GovmError> {
        if self.is_current(version)? {
            return Err(GovmError::CannotRemoveCurrent {
                version: version.to_string(),
            });
        }

        match fs::remove_dir_all(self.version_root(version)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Enumerate installed versions: `go?*` directories under the root,
    /// lexically sorted. The `go` pointer itself is excluded (it is a
    /// symlink, and too short to match anyway).
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::Io`] if the root cannot be read; a missing
    /// root means nothing is installed yet.
    pub fn installed(&self) -> Result<Vec<String>, GovmError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut versions = Vec::new();
        for entry in entries {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.starts_with("go") || name.len() <= 2 {
                continue;
            }
            // Symlinks are skipped so a dangling pointer is never listed
            // as an installed version.
            if entry.file_type()?.is_dir() && !entry.file_type()?.is_symlink() {
                versions.push(name);
            }
        }
        versions.sort();
        Ok(versions)
    }
}

#[cfg(unix)]
fn remove_link(link: &Path) -> std::io::Result<()> {
    fs::remove_file(link)
}

#[cfg(windows)]
fn remove_link(link: &Path) -> std::io::Result<()> {
    // Directory symlinks are removed as directories on Windows.
    fs::remove_dir(link)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sdk_with_versions(versions: &[&str]) -> (TempDir, Sdk) {
        let dir = TempDir::new().unwrap();
        let sdk = Sdk::new(dir.path().join("sdk"));
        for v in versions {
            fs::create_dir_all(sdk.version_root(v).join("bin")).unwrap();
        }
        (dir, sdk)
    }

    #[test]
    fn set_current_then_is_current_holds() {
        let (_dir, sdk) = sdk_with_versions(&["go1.22.0"]);
        sdk.set_current("go1.22.0").unwrap();
        assert!(sdk.is_current("go1.22.0").unwrap());
    }

    #[test]
    fn switching_moves_the_pointer_exclusively() {
        let (_dir, sdk) = sdk_with_versions(&["go1.21.8", "go1.22.0"]);
        sdk.set_current("go1.21.8").unwrap();
        sdk.set_current("go1.22.0").unwrap();
        assert!(!sdk.is_current("go1.21.8").unwrap());
        assert!(sdk.is_current("go1.22.0").unwrap());
        // Still a symlink, never a copied directory.
        let meta = fs::symlink_metadata(sdk.current_link()).unwrap();
        assert!(meta.file_type().is_symlink());
    }

    #[test]
    fn missing_pointer_is_not_current_and_not_an_error() {
        let (_dir, sdk) = sdk_with_versions(&["go1.22.0"]);
        assert!(!sdk.is_current("go1.22.0").unwrap());
    }

    #[test]
    fn remove_refuses_current_version_and_leaves_state_untouched() {
        let (_dir, sdk) = sdk_with_versions(&["go1.22.0"]);
        sdk.set_current("go1.22.0").unwrap();

        let err = sdk.remove("go1.22.0").unwrap_err();
        assert!(matches!(err, GovmError::CannotRemoveCurrent { .. }));
        assert!(sdk.version_root("go1.22.0").exists());
        assert!(sdk.is_current("go1.22.0").unwrap());
    }

    #[test]
    fn remove_deletes_non_current_version() {
        let (_dir, sdk) = sdk_with_versions(&["go1.21.8", "go1.22.0"]);
        sdk.set_current("go1.22.0").unwrap();

        sdk.remove("go1.21.8").unwrap();
        assert!(!sdk.version_root("go1.21.8").exists());
        assert!(sdk.is_current("go1.22.0").unwrap());
    }

    #[test]
    fn remove_of_uninstalled_version_is_a_silent_noop() {
        let (_dir, sdk) = sdk_with_versions(&["go1.22.0"]);
        sdk.set_current("go1.22.0").unwrap();
        sdk.remove("go1.19").unwrap();
    }

    #[test]
    fn remove_without_any_pointer_succeeds() {
        let (_dir, sdk) = sdk_with_versions(&["go1.22.0"]);
        sdk.remove("go1.22.0").unwrap();
        assert!(!sdk.version_root("go1.22.0").exists());
    }

    #[test]
    fn installed_lists_version_dirs_not_the_pointer() {
        let (_dir, sdk) = sdk_with_versions(&["go1.22.0", "go1.21.8", "gotip"]);
        sdk.set_current("go1.22.0").unwrap();
        fs::write(sdk.root().join("gonotes.txt"), "x").unwrap();

        let installed = sdk.installed().unwrap();
        assert_eq!(installed, vec!["go1.21.8", "go1.22.0", "gotip"]);
    }

    #[test]
    fn installed_on_missing_root_is_empty() {
        let dir = TempDir::new().unwrap();
        let sdk = Sdk::new(dir.path().join("sdk"));
        assert!(sdk.installed().unwrap().is_empty());
    }
}
