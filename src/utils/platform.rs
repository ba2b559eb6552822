//! Platform-specific helpers and cross-platform compatibility
//!
//! govm needs to answer three platform questions: where the user's home
//! directory is, which shell is running, and which Go release-catalog
//! platform tags describe the current host. The catalog uses Go's own
//! naming (`darwin`/`amd64`/`arm64`/`386`), not Rust's, so the host
//! mapping lives here rather than leaking `std::env::consts` strings into
//! the catalog predicate.
//!
//! # Examples
//!
//! ```rust,no_run
//! use govm_cli::utils::platform::{get_home_dir, host_platform};
//!
//! # fn example() -> anyhow::Result<()> {
//! let home = get_home_dir()?;
//! let sdk = home.join("sdk");
//!
//! let host = host_platform();
//! println!("catalog tags: os={} arch={}", host.os, host.arch);
//! # Ok(())
//! # }
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;

/// The current host described in Go release-catalog terms.
///
/// `os` and `arch` hold the tags the catalog uses in its `os`/`arch`
/// fields, after mapping from Rust's platform names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostPlatform {
    /// Catalog operating-system tag (`linux`, `darwin`, `windows`, ...)
    pub os: &'static str,
    /// Catalog architecture tag (`amd64`, `arm64`, `386`, `armv6l`, ...)
    pub arch: &'static str,
}

/// Get the current host platform in catalog terms.
///
/// Maps Rust's `std::env::consts` names to the tags the Go release
/// catalog publishes. The one irregular case: 32-bit ARM Linux archives
/// are tagged `armv6l`, not `arm`.
#[must_use]
pub fn host_platform() -> HostPlatform {
    let os = match std::env::consts::OS {
        "macos" => "darwin",
        other => other,
    };

    let arch = match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "arm" => {
            if matches!(std::env::consts::OS, "linux") {
                "armv6l"
            } else {
                "arm"
            }
        }
        other => other,
    };

    HostPlatform { os, arch }
}

/// Get the user's home directory.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined, which
/// typically only happens in stripped-down container environments.
pub fn get_home_dir() -> Result<PathBuf> {
    dirs::home_dir().context("failed to get home directory")
}

/// Name of the currently running shell, from the `SHELL` environment
/// variable (empty when unset, as on most Windows consoles).
#[must_use]
pub fn current_shell() -> String {
    std::env::var("SHELL").unwrap_or_default()
}

/// Check if running on Windows
#[must_use]
pub const fn is_windows() -> bool {
    cfg!(target_os = "windows")
}
