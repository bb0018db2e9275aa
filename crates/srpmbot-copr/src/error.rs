//! Error types for the build service client.

use std::path::PathBuf;

/// Result type for build service operations.
pub type CoprResult<T> = Result<T, CoprError>;

/// Build service error types.
#[derive(Debug, thiserror::Error)]
pub enum CoprError {
    /// The credentials file does not exist.
    #[error("no Copr configuration file found at {0}")]
    MissingCredentials(PathBuf),

    /// The credentials file cannot be used.
    #[error("failed to read Copr configuration from {path}: {reason}")]
    InvalidCredentials { path: PathBuf, reason: String },

    /// The build target is not `project` or `owner/project`.
    #[error("invalid Copr target: {0}")]
    InvalidTarget(String),

    /// The HTTP request failed.
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client could not be set up.
    #[error("failed to create the HTTP client")]
    Client(#[source] reqwest::Error),

    /// Copr answered with an error.
    #[error("Copr API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CoprError {
    /// Returns true if repeating the request cannot succeed: a 4xx answer
    /// other than a timeout (408) or rate limit (429).
    #[must_use]
    pub fn is_permanent(&self) -> bool {
        match self {
            Self::Api { status, .. } => (400..500).contains(status) && !matches!(*status, 408 | 429),
            _ => false,
        }
    }
}
