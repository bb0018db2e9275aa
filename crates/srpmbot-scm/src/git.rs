//! Git backend.

use std::path::Path;

use git2::Repository;
use tracing::debug;

use crate::process::run_command_in_dir;
use crate::{CommandOutput, CommitId, ScmError, ScmKind, ScmResult, SourceProvider};

/// Number of hex digits kept from a git commit hash.
const HASH_LEN: usize = 8;

/// Git working copies, read through libgit2 and synchronized with `git pull`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitProvider;

impl GitProvider {
    /// Creates a new git provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SourceProvider for GitProvider {
    fn kind(&self) -> ScmKind {
        ScmKind::Git
    }

    fn init(&self) -> ScmResult<()> {
        which::which("git")
            .map(|_| ())
            .map_err(|_| ScmError::BackendUnavailable("git".to_string()))
    }

    fn clone_repository(&self, url: &str, path: &Path) -> ScmResult<()> {
        debug!(url, path = %path.display(), "cloning git repository");
        Repository::clone(url, path).map_err(|e| ScmError::CloneFailed {
            url: url.to_string(),
            reason: e.message().to_string(),
        })?;
        Ok(())
    }

    fn pull(&self, path: &Path) -> ScmResult<CommandOutput> {
        run_command_in_dir("git", ["pull"], path)
    }

    fn commit_identifier(&self, path: &Path) -> ScmResult<CommitId> {
        let repo = Repository::open(path).map_err(|_| ScmError::NotARepo(path.to_path_buf()))?;
        let head = repo
            .head()
            .map_err(|_| ScmError::NoCommits(path.to_path_buf()))?;
        let commit = head.peel_to_commit()?;
        Ok(CommitId::truncated(&commit.id().to_string(), HASH_LEN))
    }

    fn archive_command(&self, project: &str, archive_name: &str, source_dir: &Path) -> String {
        format!(
            "git archive --format=tar --prefix={project}/ -o{}/{archive_name} HEAD",
            source_dir.display()
        )
    }
}
