//! Core error types.

use std::path::PathBuf;

use thiserror::Error;

/// Core-related errors.
///
/// All of these are scoped to a single project: callers log them and move on
/// to the next project.
#[derive(Debug, Error)]
pub enum CoreError {
    /// SCM error.
    #[error("scm error: {0}")]
    Scm(#[from] srpmbot_scm::ScmError),

    /// Spec file error.
    #[error("spec error: {0}")]
    Spec(#[from] srpmbot_spec::SpecError),

    /// A required project option is missing.
    #[error("project \"{project}\" does not specify a \"{option}\" option")]
    MissingOption { project: String, option: String },

    /// The archive command output names no archive.
    #[error("no archive name found in the output of the archive command for {project}")]
    ArchiveNotFound { project: String },

    /// The archive is not where it should be.
    #[error("archive {name} not found in {}", dir.display())]
    ArchiveMissing { name: String, dir: PathBuf },

    /// Pulling failed again after a fresh clone.
    #[error("pull failed for {project} even after re-cloning: {output}")]
    PullFailed { project: String, output: String },

    /// `rpmbuild` exited with a failure status.
    #[error("rpmbuild failed:\n  stdout: {stdout}\n  stderr: {stderr}")]
    SrpmBuildFailed { stdout: String, stderr: String },

    /// `rpmbuild` succeeded but did not say where it wrote the package.
    #[error("rpmbuild did not report the source package path: {0}")]
    SrpmNotReported(String),

    /// The rpm source directory could not be determined.
    #[error("failed to query the rpm source directory: {0}")]
    SourceDir(String),

    /// Invalid glob pattern in `patch_files`.
    #[error("invalid patch pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;
