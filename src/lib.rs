//! govm - a command-line installer and version manager for the Go toolchain
//!
//! govm keeps any number of Go versions installed side by side under
//! `<home>/sdk/<version>` and maintains a single symlink, `<home>/sdk/go`,
//! that marks which one is current. Switching versions is a pointer swap,
//! never a copy; removing the current version is refused outright.
//!
//! # Architecture Overview
//!
//! The interesting part of the tool is a small state machine: turn a
//! free-form specifier into a concrete installed version, then move the
//! current pointer with correct invariants under partial failure.
//!
//! - `govm 1.21.5` resolves the specifier, installs if needed, and swaps
//!   the pointer
//! - `govm latest` asks the release catalog for the newest stable version
//! - `govm tip 23102` builds the development tip at a specific changelist
//! - the first install on a pristine host bootstraps a compiler from a
//!   release archive, with nothing bundled in the binary
//!
//! # Core Modules
//!
//! - [`catalog`] - release catalog fetching and the installability filter
//! - [`version`] - specifier normalization and resolution
//! - [`installer`] - idempotent ensure-installed plus first-run bootstrap
//! - [`sdk`] - the `<home>/sdk` layout and the current-pointer contract
//! - [`profile`] - shell profile persistence and the setup prompt
//! - [`cli`] - command-line interface
//! - [`core`] - error types and user-facing error display
//! - [`utils`] - platform mapping and the external-command seam
//!
//! # Command-Line Usage
//!
//! ```bash
//! govm               # show current toolchain, bootstrap if none
//! govm list          # list installed versions
//! govm list all      # list all stable versions
//! govm 1.21.5        # install 1.21.5 if needed, make it default
//! govm latest        # same, for the newest stable release
//! govm remove 1.20   # delete an installed version
//! govm setup         # persist GOPATH/PATH for future sessions
//! ```

pub mod catalog;
pub mod cli;
pub mod core;
pub mod installer;
pub mod profile;
pub mod sdk;
pub mod utils;
pub mod version;
