//! SCM error types.

use std::path::PathBuf;

use thiserror::Error;

/// Version control related errors.
#[derive(Debug, Error)]
pub enum ScmError {
    /// The configured backend name is not one we know.
    #[error("unknown scm backend: {0}")]
    UnknownBackend(String),

    /// The backend's tooling is not installed.
    #[error("scm backend unavailable: `{0}` not found in PATH")]
    BackendUnavailable(String),

    /// Cloning the remote repository failed.
    #[error("failed to clone {url}: {reason}")]
    CloneFailed { url: String, reason: String },

    /// Not a repository of the expected kind.
    #[error("not a repository: {0}")]
    NotARepo(PathBuf),

    /// No commits found.
    #[error("no commits found in {0}")]
    NoCommits(PathBuf),

    /// A backend command exited with a failure status.
    #[error("`{command}` failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    /// A process could not be started at all.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Git2 error.
    #[error("git error: {0}")]
    Git2(#[from] git2::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for SCM operations.
pub type ScmResult<T> = Result<T, ScmError>;
