//! Cross-platform utilities and helpers
//!
//! # Modules
//!
//! - [`platform`] - Home directory resolution, shell detection, and the
//!   host-to-catalog platform mapping
//! - [`process`] - The [`CommandRunner`] seam for external process execution

pub mod platform;
pub mod process;

pub use platform::{HostPlatform, current_shell, get_home_dir, host_platform, is_windows};
pub use process::{CommandRunner, SystemRunner};
