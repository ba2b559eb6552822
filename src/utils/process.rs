//! External command execution
//!
//! govm drives three kinds of external processes: the bootstrap `go`
//! compiler, the per-version installer subcommand (`go1.N.M download`), and
//! the Windows registry setter. All of them run through the [`CommandRunner`]
//! trait so the installer and profile writer can be exercised in tests with
//! a fake runner instead of a real toolchain.
//!
//! Execution is synchronous and blocking, matching the tool's sequential
//! business logic. `run` inherits the parent's stdio so installer progress
//! is visible; `run_capture` collects trimmed stdout for things like
//! `go env GOROOT`.

use crate::core::GovmError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Stdio};

/// Capability to run external commands, injected into the installer and
/// profile writer so tests can substitute a fake.
pub trait CommandRunner: Send + Sync {
    /// Run a command with inherited stdio, with extra environment variables
    /// applied on top of the current environment.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::CommandFailed`] if the command cannot be spawned
    /// or exits unsuccessfully.
    fn run(&self, program: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<(), GovmError>;

    /// Run a command and capture its trimmed stdout.
    ///
    /// # Errors
    ///
    /// Returns [`GovmError::CommandFailed`] if the command cannot be spawned
    /// or exits unsuccessfully; captured stderr is included in the error.
    fn run_capture(&self, program: &Path, args: &[&str]) -> Result<String, GovmError>;
}

/// [`CommandRunner`] backed by [`std::process::Command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn display_command(program: &Path, args: &[&str]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().map(ToString::to_string));
    parts.join(" ")
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &Path, args: &[&str], envs: &[(&str, &str)]) -> Result<(), GovmError> {
        let mut command = Command::new(program);
        command.args(args);
        for (name, value) in envs {
            command.env(OsStr::new(name), OsStr::new(value));
        }

        tracing::debug!(command = %display_command(program, args), "running external command");

        let status = command.status().map_err(|e| GovmError::CommandFailed {
            command: display_command(program, args),
            detail: e.to_string(),
        })?;

        if status.success() {
            Ok(())
        } else {
            Err(GovmError::CommandFailed {
                command: display_command(program, args),
                detail: status.to_string(),
            })
        }
    }

    fn run_capture(&self, program: &Path, args: &[&str]) -> Result<String, GovmError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| GovmError::CommandFailed {
                command: display_command(program, args),
                detail: e.to_string(),
            })?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
        } else {
            Err(GovmError::CommandFailed {
                command: display_command(program, args),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! A recording fake runner for unit tests.

    use super::{CommandRunner, GovmError, display_command};
    use std::path::Path;
    use std::sync::Mutex;

    /// Records every invocation and answers `run_capture` from a canned
    /// response table keyed by the joined command line.
    #[derive(Default)]
    pub struct FakeRunner {
        pub calls: Mutex<Vec<String>>,
        pub responses: Mutex<Vec<(String, Result<String, String>)>>,
    }

    impl FakeRunner {
        pub fn respond(&self, command: &str, response: Result<&str, &str>) {
            self.responses.lock().unwrap().push((
                command.to_string(),
                response.map(str::to_string).map_err(str::to_string),
            ));
        }

        pub fn recorded(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            program: &Path,
            args: &[&str],
            _envs: &[(&str, &str)],
        ) -> Result<(), GovmError> {
            let line = display_command(program, args);
            self.calls.lock().unwrap().push(line);
            Ok(())
        }

        fn run_capture(&self, program: &Path, args: &[&str]) -> Result<String, GovmError> {
            let line = display_command(program, args);
            self.calls.lock().unwrap().push(line.clone());
            let responses = self.responses.lock().unwrap();
            for (command, response) in responses.iter() {
                if *command == line {
                    return response.clone().map_err(|detail| GovmError::CommandFailed {
                        command: line.clone(),
                        detail,
                    });
                }
            }
            Err(GovmError::CommandFailed {
                command: line,
                detail: "no canned response".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn capture_trims_output() {
        let runner = SystemRunner::new();
        let echo = PathBuf::from("/bin/echo");
        if !echo.exists() {
            return;
        }
        let out = runner.run_capture(&echo, &["hello"]).unwrap();
        assert_eq!(out, "hello");
    }

    #[test]
    fn missing_program_is_command_failed() {
        let runner = SystemRunner::new();
        let err = runner
            .run_capture(Path::new("/nonexistent/definitely-not-go"), &["version"])
            .unwrap_err();
        assert!(matches!(err, GovmError::CommandFailed { .. }));
    }

    #[test]
    fn failing_status_is_reported() {
        let runner = SystemRunner::new();
        let sh = PathBuf::from("/bin/sh");
        if !sh.exists() {
            return;
        }
        let err = runner.run(&sh, &["-c", "exit 3"], &[]).unwrap_err();
        match err {
            GovmError::CommandFailed { detail, .. } => assert!(detail.contains('3')),
            other => panic!("unexpected error: {other}"),
        }
    }
}
