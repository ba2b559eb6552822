//! Core types and error handling for govm
//!
//! This module hosts the crate-wide error type and its user-friendly display
//! wrapper. The business-logic modules ([`crate::catalog`], [`crate::version`],
//! [`crate::installer`], [`crate::sdk`], [`crate::profile`]) all surface
//! failures as [`GovmError`] values, which the CLI entry point converts to a
//! colored report via [`user_friendly_error`].

pub mod error;

pub use error::{ErrorContext, GovmError, user_friendly_error};
