//! Shell profile persistence and environment setup
//!
//! `govm setup` makes the selected toolchain usable in future sessions:
//! it persists `GOPATH` and puts `<sdk>/go/bin` and `<gopath>/bin` on the
//! PATH. On POSIX shells that means appending `export` lines to the
//! shell's profile file (`~/.bash_profile` for bash, `~/.zshrc` for zsh;
//! anything else is refused). On Windows the variable is written to the
//! user-scope registry store through PowerShell.
//!
//! Appending is idempotent by literal line comparison: the target file is
//! scanned first and the exact export line is never duplicated. PATH
//! augmentation instead checks directory membership in the *current*
//! `PATH` value, so re-running setup in a session that already sourced the
//! profile is also a no-op.
//!
//! The interactive prompt is the single suspension point in the whole
//! tool: the blocking stdin read runs on a background task and is raced
//! against Ctrl-C. Cancellation aborts the operation with an error, never
//! a silently assumed default.

use crate::core::GovmError;
use crate::sdk::Sdk;
use crate::utils::platform::{current_shell, get_home_dir};
use crate::utils::process::CommandRunner;
use std::fs::OpenOptions;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

const BASH_CONFIG: &str = ".bash_profile";
const ZSH_CONFIG: &str = ".zshrc";

const ENV_SEPARATOR: &str = if cfg!(windows) { ";" } else { ":" };

/// Literal PATH reference used when appending to PATH in a profile line.
fn path_var() -> String {
    if cfg!(windows) {
        std::env::var("PATH").unwrap_or_default()
    } else {
        "$PATH".to_string()
    }
}

/// Whether `dir` is already a member of the given `PATH` value.
#[must_use]
pub fn is_in_path_value(dir: &Path, path_value: &str) -> bool {
    path_value
        .split(ENV_SEPARATOR)
        .any(|d| Path::new(d) == dir)
}

/// Resolve the profile file for a shell name. Only `bash` and `zsh` are
/// recognized; the match is by substring so `/bin/bash` and `-zsh` work.
pub fn shell_config_path(home: &Path, shell: &str) -> Result<PathBuf, GovmError> {
    if shell.contains("bash") {
        Ok(home.join(BASH_CONFIG))
    } else if shell.contains("zsh") {
        Ok(home.join(ZSH_CONFIG))
    } else {
        Err(GovmError::UnsupportedShell {
            shell: shell.to_string(),
        })
    }
}

/// Scan a file line-by-line for an exact literal match.
fn line_exists(path: &Path, line: &str) -> Result<bool, GovmError> {
    let file = match std::fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e.into()),
    };

    for existing in BufReader::new(file).lines() {
        if existing? == line {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Append a line to a file unless the exact literal line is already
/// present. Creates the file if needed.
pub fn append_line(path: &Path, line: &str) -> Result<(), GovmError> {
    if line_exists(path, line)? {
        tracing::debug!(line, path = %path.display(), "line already present");
        return Ok(());
    }

    println!("Adding {line:?} to {}", path.display());
    let mut file = OpenOptions::new().append(true).create(true).open(path)?;
    writeln!(file, "\n{line}")?;
    Ok(())
}

/// Writes environment variables to the platform's persistent store.
pub struct ProfileWriter<'a> {
    // The runner only drives the registry setter today, so it is idle on
    // POSIX builds.
    #[cfg_attr(not(windows), allow(dead_code))]
    runner: &'a dyn CommandRunner,
    home: PathBuf,
    shell: String,
}

impl<'a> ProfileWriter<'a> {
    /// Create a profile writer for the current user and shell.
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined.
    pub fn new(runner: &'a dyn CommandRunner) -> anyhow::Result<Self> {
        Ok(Self {
            runner,
            home: get_home_dir()?,
            shell: current_shell(),
        })
    }

    /// Create a profile writer with explicit home and shell (tests).
    #[must_use]
    pub fn with_env(runner: &'a dyn CommandRunner, home: PathBuf, shell: String) -> Self {
        Self {
            runner,
            home,
            shell,
        }
    }

    /// Persist `NAME=VALUE` for future sessions.
    ///
    /// On Windows this sets a user-scope registry variable via PowerShell
    /// and, when running inside a Windows console shell, also updates the
    /// live process environment. On POSIX shells it appends an
    /// `export NAME=VALUE` line to the shell's profile file.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::UnsupportedShell`] for unrecognized shells,
    /// [`GovmError::CommandFailed`] if the registry setter fails, or
    /// [`GovmError::Io`] on file append failure.
    pub fn persist_env_var(&self, name: &str, value: &str) -> Result<(), GovmError> {
        let name = name.to_uppercase();

        #[cfg(windows)]
        {
            self.persist_env_var_windows(&name, value)?;
            if self.shell.contains("cmd.exe") || self.shell.contains("powershell.exe") {
                // Windows console shells don't source a profile file, so
                // the live process environment is the session store.
                unsafe { std::env::set_var(&name, value) };
                return Ok(());
            }
            // User is in bash, zsh, etc.; also write their shell config.
        }

        let config = shell_config_path(&self.home, &self.shell)?;
        let line = format!("export {name}={value}");
        append_line(&config, &line)
    }

    #[cfg(windows)]
    fn persist_env_var_windows(&self, name: &str, value: &str) -> Result<(), GovmError> {
        let script =
            format!(r#"[Environment]::SetEnvironmentVariable("{name}", "{value}", "User")"#);
        self.runner
            .run(Path::new("powershell"), &["-command", &script], &[])
    }

    /// Add a directory to PATH for future sessions, unless it is already a
    /// member of the current `PATH` value.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`ProfileWriter::persist_env_var`].
    pub fn append_to_path(&self, dir: &Path) -> Result<(), GovmError> {
        let current = std::env::var("PATH").unwrap_or_default();
        if is_in_path_value(dir, &current) {
            tracing::debug!(dir = %dir.display(), "already on PATH");
            return Ok(());
        }
        let value = format!("{}{ENV_SEPARATOR}{}", path_var(), dir.display());
        self.persist_env_var("PATH", &value)
    }

    /// Interactive GOPATH and PATH setup.
    ///
    /// Prompts for confirmation (skipped when `interactive` is false, where
    /// the default answer applies), persists `GOPATH` if it is not already
    /// set, and puts both `<sdk>/go/bin` and `<gopath>/bin` on the PATH.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::Cancelled`] if the prompt is interrupted, plus
    /// the persistence failure modes above.
    pub async fn setup_gopath(&self, sdk: &Sdk, interactive: bool) -> Result<(), GovmError> {
        let answer = prompt(
            "Would you like us to setup your GOPATH? Y/n",
            "Y",
            interactive,
        )
        .await?;

        if answer.to_lowercase() != "y" {
            println!("Exiting and not setting up GOPATH.");
            return Ok(());
        }

        println!("Setting up GOPATH");

        let gopath = match std::env::var("GOPATH") {
            Ok(gopath) if !gopath.is_empty() => {
                println!("GOPATH is already set to {gopath}");
                PathBuf::from(gopath)
            }
            _ => {
                let gopath = self.home.join("go");
                self.persist_env_var("GOPATH", &gopath.display().to_string())?;
                println!("GOPATH has been set up!");
                gopath
            }
        };

        self.append_to_path(&sdk.current_link().join("bin"))?;
        self.append_to_path(&gopath.join("bin"))?;

        if !cfg!(windows) {
            if let Ok(config) = shell_config_path(&self.home, &self.shell) {
                println!("Run `source {}` to apply the changes to this session.", config.display());
            }
        }
        Ok(())
    }
}

/// Read one line from stdin, racing against Ctrl-C.
///
/// Non-interactive callers get the default answer without touching stdin.
/// An empty answer also means the default. The blocking read runs on a
/// background task; whichever of {line read, cancellation} completes first
/// wins, and cancellation surfaces as [`GovmError::Cancelled`].
///
/// # Errors
///
/// Returns [`GovmError::Cancelled`] on Ctrl-C, or [`GovmError::Io`] if
/// reading stdin fails.
pub async fn prompt(query: &str, default: &str, interactive: bool) -> Result<String, GovmError> {
    if !interactive {
        return Ok(default.to_string());
    }

    print!("{query} [{default}]: ");
    std::io::stdout().flush()?;

    let read_line = tokio::task::spawn_blocking(|| {
        let mut answer = String::new();
        std::io::stdin().read_line(&mut answer).map(|_| answer)
    });

    tokio::select! {
        line = read_line => {
            let answer = line
                .map_err(|e| GovmError::Io(std::io::Error::other(e)))??
                .trim()
                .to_string();
            if answer.is_empty() {
                Ok(default.to_string())
            } else {
                Ok(answer)
            }
        }
        _ = tokio::signal::ctrl_c() => Err(GovmError::Cancelled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::process::fake::FakeRunner;
    use tempfile::TempDir;

    #[test]
    fn shell_config_recognizes_bash_and_zsh_only() {
        let home = Path::new("/home/u");
        assert_eq!(
            shell_config_path(home, "/bin/bash").unwrap(),
            home.join(".bash_profile")
        );
        assert_eq!(
            shell_config_path(home, "-zsh").unwrap(),
            home.join(".zshrc")
        );
        let err = shell_config_path(home, "/usr/bin/fish").unwrap_err();
        assert!(matches!(err, GovmError::UnsupportedShell { .. }));
    }

    #[test]
    fn append_line_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let rc = dir.path().join(".zshrc");

        append_line(&rc, "export GOPATH=/home/u/go").unwrap();
        append_line(&rc, "export GOPATH=/home/u/go").unwrap();
        append_line(&rc, "export PATH=$PATH:/home/u/go/bin").unwrap();

        let contents = std::fs::read_to_string(&rc).unwrap();
        assert_eq!(contents.matches("export GOPATH=/home/u/go").count(), 1);
        assert_eq!(
            contents
                .matches("export PATH=$PATH:/home/u/go/bin")
                .count(),
            1
        );
    }

    #[test]
    fn append_line_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let rc = dir.path().join(".bash_profile");
        append_line(&rc, "export GOPATH=/g").unwrap();
        assert!(std::fs::read_to_string(&rc).unwrap().contains("export GOPATH=/g"));
    }

    #[test]
    fn path_membership_is_exact_per_component() {
        let dir = Path::new("/home/u/go/bin");
        assert!(is_in_path_value(dir, "/usr/bin:/home/u/go/bin:/bin"));
        assert!(!is_in_path_value(dir, "/usr/bin:/home/u/go:/bin"));
        assert!(!is_in_path_value(dir, ""));
    }

    #[test]
    fn persist_env_var_writes_export_line() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::default();
        let writer = ProfileWriter::with_env(
            &runner,
            dir.path().to_path_buf(),
            "/bin/zsh".to_string(),
        );

        writer.persist_env_var("gopath", "/home/u/go").unwrap();

        let contents = std::fs::read_to_string(dir.path().join(".zshrc")).unwrap();
        assert!(contents.contains("export GOPATH=/home/u/go"));
    }

    #[test]
    fn persist_env_var_refuses_unknown_shell() {
        let dir = TempDir::new().unwrap();
        let runner = FakeRunner::default();
        let writer = ProfileWriter::with_env(
            &runner,
            dir.path().to_path_buf(),
            "/usr/bin/fish".to_string(),
        );

        let err = writer.persist_env_var("GOPATH", "/g").unwrap_err();
        assert!(matches!(err, GovmError::UnsupportedShell { .. }));
    }

    #[tokio::test]
    async fn non_interactive_prompt_returns_default() {
        let answer = prompt("Setup?", "Y", false).await.unwrap();
        assert_eq!(answer, "Y");
    }
}
