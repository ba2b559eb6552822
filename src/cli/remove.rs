//! Remove an installed version.
//!
//! The specifier is normalized first, so `govm remove 1.15` and
//! `govm remove go1.15` are equivalent. Removal of the current version is
//! refused by the pointer guard before anything touches the filesystem.

use anyhow::Result;
use clap::Args;

use crate::sdk::Sdk;
use crate::version::normalize;

/// Command to remove an installed version.
#[derive(Args)]
pub struct RemoveCommand {
    /// Version to remove, e.g. `1.15` or `go1.15`
    #[arg(value_name = "VERSION")]
    version: String,
}

impl RemoveCommand {
    /// Execute the remove command.
    ///
    /// # Errors
    ///
    /// Returns the guard error when the version is current, or an I/O
    /// error if deletion fails.
    pub async fn execute(self) -> Result<()> {
        let version = normalize(&self.version);
        let sdk = Sdk::from_home()?;
        sdk.remove(&version)?;
        println!("{version}: removed");
        Ok(())
    }
}
