//! Persist environment setup for future sessions.

use anyhow::Result;
use clap::Args;

use crate::profile::ProfileWriter;
use crate::sdk::Sdk;
use crate::utils::process::SystemRunner;

/// Command to set up GOPATH and PATH.
#[derive(Args)]
pub struct SetupCommand {
    /// Run noninteractively, accepting the default answers
    #[arg(short = 's', long = "silent")]
    silent: bool,
}

impl SetupCommand {
    /// Execute the setup command.
    ///
    /// # Errors
    ///
    /// Propagates unsupported-shell, cancellation, and file append
    /// failures.
    pub async fn execute(self) -> Result<()> {
        let runner = SystemRunner::new();
        let sdk = Sdk::from_home()?;
        let writer = ProfileWriter::new(&runner)?;
        writer.setup_gopath(&sdk, !self.silent).await?;
        Ok(())
    }
}
