//! Mercurial backend, driven through the `hg` command line.

use std::ffi::OsStr;
use std::path::Path;

use tracing::debug;

use crate::process::{run_command, run_command_in_dir};
use crate::{CommandOutput, CommitId, ScmError, ScmKind, ScmResult, SourceProvider};

const HASH_LEN: usize = 12;

/// Mercurial working copies.
#[derive(Debug, Clone, Copy, Default)]
pub struct MercurialProvider;

impl MercurialProvider {
    /// Creates a new Mercurial provider.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl SourceProvider for MercurialProvider {
    fn kind(&self) -> ScmKind {
        ScmKind::Mercurial
    }

    fn init(&self) -> ScmResult<()> {
        which::which("hg")
            .map(|_| ())
            .map_err(|_| ScmError::BackendUnavailable("hg".to_string()))
    }

    fn clone_repository(&self, url: &str, path: &Path) -> ScmResult<()> {
        debug!(url, path = %path.display(), "cloning mercurial repository");
        let output = run_command("hg", [OsStr::new("clone"), OsStr::new(url), path.as_os_str()])
            .map_err(|e| ScmError::CloneFailed {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        if !output.success() {
            return Err(ScmError::CloneFailed {
                url: url.to_string(),
                reason: output.stderr.trim().to_string(),
            });
        }
        Ok(())
    }

    fn pull(&self, path: &Path) -> ScmResult<CommandOutput> {
        run_command_in_dir("hg", ["pull"], path)
    }

    fn commit_identifier(&self, path: &Path) -> ScmResult<CommitId> {
        let output = run_command_in_dir("hg", ["log", "-r", "tip", "--template", "{node}"], path)?
            .into_result("hg log -r tip")?;
        let node = output.stdout.trim();
        if node.is_empty() {
            return Err(ScmError::NoCommits(path.to_path_buf()));
        }
        Ok(CommitId::truncated(node, HASH_LEN))
    }

    fn archive_command(&self, project: &str, archive_name: &str, source_dir: &Path) -> String {
        format!(
            "hg archive --type=tar --prefix={project}/ {}/{archive_name}",
            source_dir.display()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_tag() {
        let provider = MercurialProvider::new();
        assert_eq!(provider.kind(), ScmKind::Mercurial);
        assert_eq!(provider.tag(), "hg");
    }

    #[test]
    fn test_archive_command() {
        let cmd = MercurialProvider::new().archive_command(
            "pyflakes",
            "pyflakes-0123456789ab.tar",
            Path::new("/srv/SOURCES"),
        );
        assert_eq!(
            cmd,
            "hg archive --type=tar --prefix=pyflakes/ /srv/SOURCES/pyflakes-0123456789ab.tar"
        );
    }
}
