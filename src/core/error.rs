//! Error handling for govm
//!
//! This module provides the error types and user-friendly error reporting for
//! the govm version manager. The error system is designed around two core
//! principles:
//! 1. **Strongly-typed errors** for precise error handling in code
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`GovmError`] - Enumerated error types for all failure cases in govm
//! - [`ErrorContext`] - Wrapper that adds user-friendly messages and suggestions
//!
//! Every error is surfaced immediately to the top level and terminates the
//! command. There is no retry logic and no partial-failure recovery anywhere
//! in the core: a failed download or a failed symlink swap leaves the system
//! in whatever state the failure occurred in, visible on the next invocation.
//! That is a deliberate simplicity choice for a single-shot CLI tool.
//!
//! # Examples
//!
//! ```rust,no_run
//! use govm_cli::core::{GovmError, user_friendly_error};
//!
//! fn remove_version() -> Result<(), GovmError> {
//!     Err(GovmError::CannotRemoveCurrent {
//!         version: "go1.22.0".to_string(),
//!     })
//! }
//!
//! if let Err(e) = remove_version() {
//!     let ctx = user_friendly_error(anyhow::Error::from(e));
//!     ctx.display(); // Shows colored error with suggestions
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for govm operations
///
/// Each variant represents a specific failure mode with enough context for
/// both programmatic handling and a useful terminal message.
///
/// # Error Categories
///
/// - **Catalog**: [`CatalogRequest`], [`CatalogParse`] - fetching or decoding
///   the remote release list
/// - **Resolution**: [`UnknownSpecifier`] - reserved; explicit versions are
///   currently accepted unchecked and fail downstream instead
/// - **Installation**: [`Download`], [`Install`], [`ChecksumMismatch`] -
///   bootstrap or per-version installer failures
/// - **Pointer management**: [`CannotRemoveCurrent`] - the guard protecting
///   the active version from deletion
/// - **Environment setup**: [`UnsupportedShell`], [`Cancelled`]
/// - **Processes and I/O**: [`CommandFailed`], [`Io`]
///
/// [`CatalogRequest`]: GovmError::CatalogRequest
/// [`CatalogParse`]: GovmError::CatalogParse
/// [`UnknownSpecifier`]: GovmError::UnknownSpecifier
/// [`Download`]: GovmError::Download
/// [`Install`]: GovmError::Install
/// [`ChecksumMismatch`]: GovmError::ChecksumMismatch
/// [`CannotRemoveCurrent`]: GovmError::CannotRemoveCurrent
/// [`UnsupportedShell`]: GovmError::UnsupportedShell
/// [`Cancelled`]: GovmError::Cancelled
/// [`CommandFailed`]: GovmError::CommandFailed
/// [`Io`]: GovmError::Io
#[derive(Error, Debug)]
pub enum GovmError {
    /// The release catalog endpoint returned a non-success status or was
    /// unreachable. Single attempt, no retry.
    #[error("release catalog request failed: {status} {url}")]
    CatalogRequest {
        /// HTTP status line or transport error description
        status: String,
        /// The catalog URL that was queried
        url: String,
    },

    /// The release catalog response body was not valid JSON for the
    /// expected schema.
    #[error("release catalog parse failed: {reason}")]
    CatalogParse {
        /// Decoder error description
        reason: String,
    },

    /// A version specifier could not be mapped to a canonical version.
    ///
    /// Currently unused: explicit versions are accepted unchecked and an
    /// invalid one fails downstream as a [`Download`](Self::Download) error.
    /// The variant is kept so the resolver contract has a named failure mode.
    #[error("unknown version specifier: {spec}")]
    UnknownSpecifier {
        /// The specifier as the user typed it
        spec: String,
    },

    /// Downloading a toolchain archive or the per-version installer
    /// package failed.
    #[error("{version}: download failed: {reason}")]
    Download {
        /// Canonical version being installed
        version: String,
        /// What went wrong
        reason: String,
    },

    /// The per-version installer subcommand (or the bootstrap unpack)
    /// failed after the download phase.
    #[error("{version}: install failed: {reason}")]
    Install {
        /// Canonical version being installed
        version: String,
        /// What went wrong
        reason: String,
    },

    /// A downloaded archive did not match its published SHA-256.
    #[error("{filename}: checksum mismatch (expected {expected}, got {actual})")]
    ChecksumMismatch {
        /// Archive file name from the catalog
        filename: String,
        /// Checksum published in the catalog
        expected: String,
        /// Checksum computed over the downloaded bytes
        actual: String,
    },

    /// Attempted to remove the version the current pointer resolves to.
    ///
    /// This is the one hard safety invariant of the whole system: the
    /// active version is never deletable through the remove path.
    #[error("{version}: can't remove default version")]
    CannotRemoveCurrent {
        /// Canonical version that is currently active
        version: String,
    },

    /// Profile persistence was requested from a shell govm does not know
    /// how to write a config file for. Only `bash` and `zsh` are recognized.
    #[error("{shell:?} is not a supported shell")]
    UnsupportedShell {
        /// Value of the running shell as detected from the environment
        shell: String,
    },

    /// An external command exited unsuccessfully.
    #[error("command `{command}` failed: {detail}")]
    CommandFailed {
        /// The program and arguments, space-joined for display
        command: String,
        /// Exit status description or captured stderr
        detail: String,
    },

    /// The interactive prompt was aborted by a cancellation signal.
    #[error("operation cancelled")]
    Cancelled,

    /// Standard I/O error wrapper
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error context wrapper providing user-friendly messages and suggestions
///
/// Wraps a [`GovmError`] with optional actionable suggestions and additional
/// details for CLI display. The suggestion is rendered in green, the details
/// in yellow, matching the severity-colored output used across the tool.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying govm error
    pub error: GovmError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from a [`GovmError`]
    #[must_use]
    pub const fn new(error: GovmError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add an actionable suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{} {}", "Error:".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("  {} {}", "Details:".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("  {} {}", "Suggestion:".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }
        Ok(())
    }
}

/// Convert any error into a user-friendly [`ErrorContext`] with contextual
/// suggestions for the common failure modes.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    match error.downcast::<GovmError>() {
        Ok(govm_error) => contextualize(govm_error),
        Err(other) => match other.downcast::<std::io::Error>() {
            Ok(io_error) => {
                let kind = io_error.kind();
                let ctx = ErrorContext::new(GovmError::Io(io_error));
                match kind {
                    std::io::ErrorKind::PermissionDenied => ctx
                        .with_suggestion("Check ownership of your home directory and ~/sdk")
                        .with_details("govm did not have permission to read or write a file"),
                    std::io::ErrorKind::NotFound => {
                        ctx.with_suggestion("Check that the file or directory exists")
                    }
                    _ => ctx,
                }
            }
            Err(other) => ErrorContext::new(GovmError::Install {
                version: "unknown".to_string(),
                reason: other.to_string(),
            }),
        },
    }
}

fn contextualize(error: GovmError) -> ErrorContext {
    match &error {
        GovmError::CatalogRequest { .. } => ErrorContext::new(error)
            .with_suggestion("Check your network connection and try again")
            .with_details("The release catalog is queried fresh on every run, with no retry"),
        GovmError::CatalogParse { .. } => ErrorContext::new(error)
            .with_suggestion("Retry later; the release service may be returning a partial response"),
        GovmError::CannotRemoveCurrent { version } => {
            let suggestion = format!(
                "Switch to another version first, e.g. `govm latest`, then remove {version}"
            );
            ErrorContext::new(error)
                .with_suggestion(suggestion)
                .with_details("The version the sdk/go symlink points at is never deletable")
        }
        GovmError::UnsupportedShell { .. } => ErrorContext::new(error)
            .with_suggestion("Add the export lines to your shell config manually")
            .with_details("Only bash and zsh profile files are managed automatically"),
        GovmError::Download { version, .. } => {
            let details = format!(
                "{version} may not exist; explicit versions are not validated against the catalog"
            );
            ErrorContext::new(error)
                .with_suggestion("Run `govm list all` to see the published stable versions")
                .with_details(details)
        }
        GovmError::ChecksumMismatch { .. } => ErrorContext::new(error)
            .with_suggestion("Retry the install; the download may have been corrupted in transit"),
        _ => ErrorContext::new(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_error_message_matches_original_wording() {
        let err = GovmError::CannotRemoveCurrent {
            version: "go1.22.0".to_string(),
        };
        assert_eq!(err.to_string(), "go1.22.0: can't remove default version");
    }

    #[test]
    fn guard_error_gets_switch_suggestion() {
        let ctx = contextualize(GovmError::CannotRemoveCurrent {
            version: "go1.22.0".to_string(),
        });
        assert!(ctx.suggestion.unwrap().contains("go1.22.0"));
    }

    #[test]
    fn io_errors_convert_via_from() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: GovmError = io.into();
        assert!(matches!(err, GovmError::Io(_)));
    }

    #[test]
    fn user_friendly_error_preserves_govm_variant() {
        let err = anyhow::Error::from(GovmError::Cancelled);
        let ctx = user_friendly_error(err);
        assert!(matches!(ctx.error, GovmError::Cancelled));
    }

    #[test]
    fn io_error_downcast_keeps_permission_suggestion() {
        let err = anyhow::Error::from(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        let ctx = user_friendly_error(err);
        assert!(ctx.suggestion.unwrap().contains("home directory"));
    }

    #[test]
    fn display_includes_suggestion_and_details() {
        let ctx = ErrorContext::new(GovmError::Cancelled)
            .with_suggestion("try again")
            .with_details("the prompt was aborted");
        let rendered = format!("{ctx}");
        assert!(rendered.contains("operation cancelled"));
        assert!(rendered.contains("Suggestion: try again"));
        assert!(rendered.contains("Details: the prompt was aborted"));
    }
}
