//! Spec file error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when updating a spec file.
#[derive(Debug, Error)]
pub enum SpecError {
    /// Spec file not found.
    #[error("spec file not found: {0}")]
    NotFound(PathBuf),

    /// The release already embeds this commit.
    #[error("spec already up to date with {commit}")]
    AlreadyUpToDate { commit: String },

    /// A required tag is missing or appears too late in the file.
    #[error("missing `{0}` line")]
    MissingField(&'static str),

    /// The release value cannot be advanced.
    #[error("cannot derive a new release from `{0}`")]
    InvalidRelease(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for spec file operations.
pub type SpecResult<T> = Result<T, SpecError>;
