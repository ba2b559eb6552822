//! Command-line interface for govm
//!
//! The CLI surface is deliberately small:
//!
//! - `govm` / `govm status` - show the current toolchain, bootstrapping the
//!   latest stable release when none exists
//! - `govm list [all]` - list installed versions; `all` adds every stable
//!   catalog version
//! - `govm remove <version>` - delete an installed version (the current one
//!   is protected)
//! - `govm setup [-s]` - persist GOPATH/PATH environment setup
//! - `govm <version> [CL]` - install a version if needed and make it the
//!   default, e.g. `govm up`, `govm latest`, `govm 1.21.5`, `govm tip 23102`
//!
//! The bare version specifier is the workhorse: anything that is not a
//! known subcommand is treated as a specifier and dispatched to the install
//! flow, which is how `govm 1.21` reads naturally. With no arguments at all
//! the tool behaves like `govm status`.

mod list;
mod remove;
mod setup;
mod status;

pub mod install;

use anyhow::Result;
use clap::{Parser, Subcommand};

const EXAMPLES: &str = "\
Examples:
    govm               Display current info, install latest if not found
    govm list          List installed versions
    govm list all      List all stable versions
    govm remove 1.15   Remove 1.15
    govm setup         Set environment variables, interactive
    govm setup -s      Set environment variables, noninteractive

    govm up            Set default, install latest if not present
    govm latest        Set default, install latest if not present
    govm 1.15          Set default, install 1.15 if not present
    govm tip           Set default, install tip if not present
    govm tip 23102     Set default, install CL 23102 if not present
";

/// Main CLI application structure for govm
///
/// A free-form version specifier doubles as the default command, so the
/// positional arguments conflict with the named subcommands: `govm latest`
/// parses as a specifier, `govm list` as the subcommand.
#[derive(Parser)]
#[command(
    name = "govm",
    about = "A command-line installer and version manager for the Go toolchain",
    long_about = None,
    version,
    after_help = EXAMPLES,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    /// The subcommand to execute; absent for the specifier/status forms.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Version specifier: a release like `1.21.5` or `go1.21.5`, an alias
    /// (`up`, `latest`, `update`), or the development tip (`tip`, `gotip`)
    #[arg(value_name = "VERSION")]
    spec: Option<String>,

    /// Changelist number, only meaningful after a tip specifier
    #[arg(value_name = "CL")]
    changelist: Option<String>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

/// Available subcommands for the govm CLI.
#[derive(Subcommand)]
enum Commands {
    /// Display the current toolchain, installing the latest stable release
    /// if no toolchain is present at all
    Status(status::StatusCommand),

    /// List installed versions; add `all` to include every stable release
    List(list::ListCommand),

    /// Remove an installed version (the current version is protected)
    Remove(remove::RemoveCommand),

    /// Persist GOPATH and PATH environment setup for future sessions
    Setup(setup::SetupCommand),
}

impl Cli {
    /// Execute the parsed command.
    ///
    /// # Errors
    ///
    /// Propagates the executed command's failure for the entry point to
    /// display and convert into a non-zero exit.
    pub async fn execute(self) -> Result<()> {
        self.init_logging();

        match self.command {
            Some(Commands::Status(cmd)) => cmd.execute().await,
            Some(Commands::List(cmd)) => cmd.execute().await,
            Some(Commands::Remove(cmd)) => cmd.execute().await,
            Some(Commands::Setup(cmd)) => cmd.execute().await,
            None => match self.spec {
                Some(spec) => {
                    install::InstallCommand::new(spec, self.changelist)
                        .execute()
                        .await
                }
                None => status::StatusCommand::default().execute().await,
            },
        }
    }

    fn init_logging(&self) {
        use tracing_subscriber::EnvFilter;

        let default_level = if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_level));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .try_init();
    }
}
