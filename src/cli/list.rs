//! List installed and available versions.
//!
//! Walks the stable catalog in server (newest-first) order and annotates
//! each version: `*` for the current one, `+` for installed, and with the
//! `all` argument a bare line for every other stable release. Versions
//! installed locally but absent from the catalog (such as `gotip`) are not
//! shown, matching the catalog-driven view of the original tool.

use anyhow::Result;
use clap::Args;
use std::collections::HashSet;

use crate::catalog::{ArchiveEntry, CatalogClient};
use crate::installer;
use crate::sdk::Sdk;
use crate::utils::process::{CommandRunner, SystemRunner};

/// Command to list versions.
#[derive(Args)]
pub struct ListCommand {
    /// Pass `all` to also list stable versions that are not installed
    #[arg(value_parser = ["all"])]
    scope: Option<String>,

    /// Shorthand for `list all`
    #[arg(short = 'a')]
    all: bool,
}

impl ListCommand {
    fn wants_all(&self) -> bool {
        self.all || self.scope.as_deref() == Some("all")
    }
    /// Execute the list command.
    ///
    /// # Errors
    ///
    /// Propagates catalog fetch failures and the current-version probe
    /// failure.
    pub async fn execute(self) -> Result<()> {
        let sdk = Sdk::from_home()?;
        let installed: HashSet<String> = sdk.installed()?.into_iter().collect();

        let current = match installer::find_go() {
            Some(gobin) => {
                let runner = SystemRunner::new();
                runner.run_capture(&gobin, &["tool", "dist", "version"])?
            }
            None => String::new(),
        };

        let all = self.wants_all();
        let installable = CatalogClient::new().fetch_installable().await?;

        for line in render(&installable, &installed, &current, all) {
            println!("{line}");
        }
        Ok(())
    }
}

/// Render one line per catalog version, in catalog order.
fn render(
    installable: &[ArchiveEntry],
    installed: &HashSet<String>,
    current: &str,
    all: bool,
) -> Vec<String> {
    let mut lines = Vec::new();
    for entry in installable {
        if installed.contains(&entry.version) {
            if entry.version == current {
                lines.push(format!("* {}", entry.version));
            } else {
                lines.push(format!("+ {}", entry.version));
            }
        } else if all {
            lines.push(format!("  {}", entry.version));
        }
    }
    lines
}
