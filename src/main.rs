//! govm CLI entry point
//!
//! Parses command-line arguments, executes the selected command, and turns
//! any failure into a user-friendly report and a non-zero exit. Success
//! paths print their own informational status lines.

use anyhow::Result;
use clap::Parser;
use govm_cli::cli;
use govm_cli::core::error::user_friendly_error;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Set up colored output for Windows
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    match cli.execute().await {
        Ok(()) => Ok(()),
        Err(e) => {
            let error_ctx = user_friendly_error(e);
            error_ctx.display();
            std::process::exit(1);
        }
    }
}
