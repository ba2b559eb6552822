//! Install a version and make it the default.
//!
//! This is the bare-specifier flow: resolve the specifier (hitting the
//! catalog only for the `up|latest|update` aliases), ensure the version is
//! installed, then swap the current pointer. When the flow had to
//! bootstrap a compiler first, a one-time `govm setup` hint is printed.

use anyhow::Result;

use crate::catalog::CatalogClient;
use crate::installer::Installer;
use crate::sdk::Sdk;
use crate::utils::process::SystemRunner;
use crate::version;

/// The install-and-select flow behind a bare version specifier.
pub struct InstallCommand {
    spec: String,
    changelist: Option<String>,
}

impl InstallCommand {
    /// Create the command from the raw specifier and optional changelist.
    #[must_use]
    pub fn new(spec: String, changelist: Option<String>) -> Self {
        Self { spec, changelist }
    }

    /// Execute the install command.
    ///
    /// # Errors
    ///
    /// Propagates resolution, download, install, and pointer-switch
    /// failures.
    pub async fn execute(self) -> Result<()> {
        let runner = SystemRunner::new();
        let sdk = Sdk::from_home()?;
        let catalog = CatalogClient::new();

        let resolved =
            version::resolve(&self.spec, self.changelist.as_deref(), &catalog).await?;

        let installer = Installer::new(&runner, &sdk, &catalog);
        let outcome = installer
            .ensure_installed(&resolved.version, resolved.cl.as_deref())
            .await?;

        sdk.set_current(&resolved.version)?;
        println!("{}: set as default", resolved.version);

        if outcome.bootstrapped {
            println!(
                "{}: you may need to run `govm setup` to set up the environment, just once",
                resolved.version
            );
        }
        Ok(())
    }
}
