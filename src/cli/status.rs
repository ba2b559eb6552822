//! Show the current toolchain, bootstrapping when none exists.
//!
//! This is the default command. With a toolchain on the PATH it prints the
//! `go version` banner and the active GOROOT. With no toolchain anywhere it
//! performs the first-run bootstrap: install the newest stable release and
//! point `<home>/sdk/go` at it.

use anyhow::Result;
use clap::Args;

use crate::catalog::CatalogClient;
use crate::installer::{self, Installer};
use crate::sdk::Sdk;
use crate::utils::process::{CommandRunner, SystemRunner};

/// Command to display current toolchain info.
#[derive(Args, Default)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Execute the status command.
    ///
    /// # Errors
    ///
    /// Propagates bootstrap failures, pointer-switch failures, and probe
    /// command failures.
    pub async fn execute(self) -> Result<()> {
        let runner = SystemRunner::new();
        let sdk = Sdk::from_home()?;

        match installer::find_go() {
            Some(gobin) => {
                let version = runner.run_capture(&gobin, &["version"])?;
                let goroot = runner.run_capture(&gobin, &["env", "GOROOT"])?;
                println!("{version} ({goroot})");
            }
            None => {
                let catalog = CatalogClient::new();
                let installer = Installer::new(&runner, &sdk, &catalog);
                let (_, version) = installer.bootstrap().await?;
                sdk.set_current(&version)?;
                println!(
                    "{version}: you may need to run `govm setup` to set up the environment, just once"
                );
            }
        }

        Ok(())
    }
}
