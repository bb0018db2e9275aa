//! The backend contract.

use std::fmt;
use std::path::Path;

use crate::{CommandOutput, GitProvider, MercurialProvider, ScmKind, ScmResult};

/// A short, backend-specific identifier of the upstream state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    /// Longest identifier a backend may produce.
    pub const MAX_LEN: usize = 12;

    /// Creates an identifier from a full hash, truncated to `len` characters.
    #[must_use]
    pub fn truncated(hash: &str, len: usize) -> Self {
        let len = len.min(Self::MAX_LEN);
        Self(hash.trim().chars().take(len).collect())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CommitId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Operations every version control backend provides.
///
/// All operations take explicit paths; implementations must not depend on the
/// current directory of the process.
pub trait SourceProvider {
    /// Returns which backend this is.
    fn kind(&self) -> ScmKind;

    /// Returns the marker embedded in release strings (`git`, `hg`).
    fn tag(&self) -> &'static str {
        self.kind().short()
    }

    /// Verifies the backend's tooling is available.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScmError::BackendUnavailable`] when it is not.
    fn init(&self) -> ScmResult<()>;

    /// Materializes a working copy of `url` at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::ScmError::CloneFailed`] on any failure.
    fn clone_repository(&self, url: &str, path: &Path) -> ScmResult<()>;

    /// Synchronizes the working copy at `path`.
    ///
    /// A non-zero exit status is reported in the returned output, not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backend command cannot be started.
    fn pull(&self, path: &Path) -> ScmResult<CommandOutput>;

    /// Returns the identifier of the current upstream state.
    ///
    /// # Errors
    ///
    /// Returns an error if the working copy cannot be read.
    fn commit_identifier(&self, path: &Path) -> ScmResult<CommitId>;

    /// Returns the shell command that writes a tar archive named `archive_name`,
    /// rooted in `<project>/`, into `source_dir`.
    fn archive_command(&self, project: &str, archive_name: &str, source_dir: &Path) -> String;
}

/// Builds the provider for the given backend.
#[must_use]
pub fn provider_for(kind: ScmKind) -> Box<dyn SourceProvider> {
    match kind {
        ScmKind::Git => Box::new(GitProvider::new()),
        ScmKind::Mercurial => Box::new(MercurialProvider::new()),
    }
}
