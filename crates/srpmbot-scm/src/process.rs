//! Synchronous process execution.
//!
//! Every helper takes the working directory explicitly; nothing here touches
//! the process-wide current directory.

use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};

use tracing::debug;

use crate::{ScmError, ScmResult};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    /// Standard output.
    pub stdout: String,
    /// Standard error.
    pub stderr: String,
}

impl CommandOutput {
    /// Creates a result from a process output.
    #[must_use]
    pub fn from_output(output: &Output) -> Self {
        Self {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        }
    }

    /// Returns true when the process exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Iterates over stdout lines followed by stderr lines.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.stdout.lines().chain(self.stderr.lines())
    }

    /// Converts a failed run into [`ScmError::CommandFailed`].
    ///
    /// # Errors
    ///
    /// Returns an error if the process did not exit successfully.
    pub fn into_result(self, command: &str) -> ScmResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(ScmError::CommandFailed {
                command: command.to_string(),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

fn spawn(program: &str, mut cmd: Command) -> ScmResult<CommandOutput> {
    let output = cmd.output().map_err(|source| ScmError::Spawn {
        program: program.to_string(),
        source,
    })?;
    let result = CommandOutput::from_output(&output);
    debug!(program, code = ?result.code, "process finished");
    Ok(result)
}

/// Runs a program and captures its output.
///
/// # Errors
///
/// Returns an error only if the process cannot be started.
pub fn run_command<I, S>(program: &str, args: I) -> ScmResult<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    spawn(program, cmd)
}

/// Runs a program inside `dir` and captures its output.
///
/// # Errors
///
/// Returns an error only if the process cannot be started.
pub fn run_command_in_dir<I, S>(program: &str, args: I, dir: &Path) -> ScmResult<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args).current_dir(dir);
    spawn(program, cmd)
}

/// Runs a program with extra environment variables and captures its output.
///
/// # Errors
///
/// Returns an error only if the process cannot be started.
pub fn run_command_with_env<I, S>(
    program: &str,
    args: I,
    env: &[(&str, &str)],
) -> ScmResult<CommandOutput>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(program);
    cmd.args(args);
    for (key, value) in env {
        cmd.env(key, value);
    }
    spawn(program, cmd)
}

/// Runs a shell command line (`sh -c`) inside `dir`.
///
/// # Errors
///
/// Returns an error only if the shell cannot be started.
pub fn run_shell_in_dir(command: &str, dir: &Path) -> ScmResult<CommandOutput> {
    debug!(command, dir = %dir.display(), "running shell command");
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command).current_dir(dir);
    spawn("sh", cmd)
}
