//! Source archive production.
//!
//! An archive either comes from the project's own command, whose output names
//! the file it produced, or from the backend's archive command with a name
//! derived from the commit.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use regex::Regex;
use srpmbot_scm::process::run_shell_in_dir;
use srpmbot_scm::{CommitId, SourceProvider};
use tracing::{debug, info, warn};

use crate::{CoreError, CoreResult, PackageTool};

/// A source archive sitting in the packaging source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveHandle {
    /// File name, as referenced by `Source0:`.
    pub name: String,
    /// Directory holding the archive.
    pub dir: PathBuf,
}

impl ArchiveHandle {
    /// Full path of the archive.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.name)
    }
}

/// Finds the archive name in the output of an archive command.
///
/// A name is `<project>-<anything>.tar`, optionally followed by `.gz` or
/// `.bz2`. When several lines mention one, the last line wins.
#[must_use]
pub fn find_archive_name<'a, I>(lines: I, project: &str) -> Option<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let pattern = format!(r"{}-\S*\.tar(?:\.gz|\.bz2)?", regex::escape(project));
    let Ok(re) = Regex::new(&pattern) else {
        return None;
    };

    lines
        .into_iter()
        .filter_map(|line| re.find(line))
        .last()
        .map(|m| m.as_str().to_string())
}

/// Renames `from` to `to`, copying across filesystems when needed.
fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Produces the source archive of a project.
pub struct ArchiveResolver<'a> {
    tool: &'a dyn PackageTool,
}

impl<'a> ArchiveResolver<'a> {
    /// Creates a resolver that places archives in `tool`'s source directory.
    #[must_use]
    pub fn new(tool: &'a dyn PackageTool) -> Self {
        Self { tool }
    }

    /// Produces the archive for `project` at `commit`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ArchiveNotFound`] when a custom command does not
    /// name its archive, and [`CoreError::ArchiveMissing`] when the expected
    /// file does not exist after the command ran.
    pub fn resolve(
        &self,
        project: &str,
        working_dir: &Path,
        commit: &CommitId,
        provider: &dyn SourceProvider,
        archive_cmd: Option<&str>,
    ) -> CoreResult<ArchiveHandle> {
        let source_dir = self.tool.source_dir()?;
        fs::create_dir_all(&source_dir)?;

        match archive_cmd {
            Some(cmd) => Self::from_command(project, working_dir, cmd, source_dir),
            None => {
                let name = format!("{project}-{commit}.tar");
                let cmd = provider.archive_command(project, &name, &source_dir);
                debug!(%cmd, "command to generate archive");
                let output = run_shell_in_dir(&cmd, working_dir)?;
                if !output.success() {
                    warn!(code = ?output.code, stderr = output.stderr.trim(), "archive command failed");
                }

                let handle = ArchiveHandle {
                    name,
                    dir: source_dir,
                };
                if !handle.path().is_file() {
                    return Err(CoreError::ArchiveMissing {
                        name: handle.name,
                        dir: handle.dir,
                    });
                }
                Ok(handle)
            }
        }
    }

    fn from_command(
        project: &str,
        working_dir: &Path,
        cmd: &str,
        source_dir: PathBuf,
    ) -> CoreResult<ArchiveHandle> {
        info!(%cmd, "running custom archive command");
        let output = run_shell_in_dir(cmd, working_dir)?;
        if !output.success() {
            warn!(code = ?output.code, "archive command exited with a failure status");
        }

        let Some(name) = find_archive_name(output.lines(), project) else {
            debug!(output = %output.stdout, "archive command output");
            return Err(CoreError::ArchiveNotFound {
                project: project.to_string(),
            });
        };

        let built = working_dir.join(&name);
        if !built.is_file() {
            return Err(CoreError::ArchiveMissing {
                name,
                dir: working_dir.to_path_buf(),
            });
        }

        let handle = ArchiveHandle {
            name,
            dir: source_dir,
        };
        move_file(&built, &handle.path())?;
        debug!(archive = %handle.path().display(), "archive moved to source directory");
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use srpmbot_scm::{CommandOutput, ScmKind, ScmResult};
    use tempfile::TempDir;

    struct FixedSourceDir(PathBuf);

    impl PackageTool for FixedSourceDir {
        fn source_dir(&self) -> CoreResult<PathBuf> {
            Ok(self.0.clone())
        }

        fn build_srpm(&self, _spec_file: &Path) -> CoreResult<PathBuf> {
            unreachable!()
        }
    }

    /// Provider whose archive command just creates the file.
    struct TouchProvider;

    impl SourceProvider for TouchProvider {
        fn kind(&self) -> ScmKind {
            ScmKind::Git
        }

        fn init(&self) -> ScmResult<()> {
            Ok(())
        }

        fn clone_repository(&self, _url: &str, _path: &Path) -> ScmResult<()> {
            Ok(())
        }

        fn pull(&self, _path: &Path) -> ScmResult<CommandOutput> {
            Ok(CommandOutput::default())
        }

        fn commit_identifier(&self, _path: &Path) -> ScmResult<CommitId> {
            Ok(CommitId::from("1a2b3c4d"))
        }

        fn archive_command(&self, _project: &str, archive_name: &str, source_dir: &Path) -> String {
            format!("touch '{}/{archive_name}'", source_dir.display())
        }
    }

    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let work = temp_dir.path().join("work");
        let sources = temp_dir.path().join("SOURCES");
        fs::create_dir_all(&work).unwrap();
        (temp_dir, work, sources)
    }

    #[test]
    fn test_find_archive_name_in_sentence() {
        let name = find_archive_name(["created foo-git1a2b3c4.tar.gz successfully"], "foo");
        assert_eq!(name.as_deref(), Some("foo-git1a2b3c4.tar.gz"));
    }

    #[test]
    fn test_find_archive_name_last_line_wins() {
        let lines = ["foo-old.tar", "noise", "wrote foo-new.tar.bz2", "done"];
        assert_eq!(
            find_archive_name(lines, "foo").as_deref(),
            Some("foo-new.tar.bz2")
        );
    }

    #[test]
    fn test_find_archive_name_escapes_project() {
        assert_eq!(find_archive_name(["libfooxbar-1.tar"], "libfoo.bar"), None);
        assert_eq!(
            find_archive_name(["libfoo.bar-1.tar"], "libfoo.bar").as_deref(),
            Some("libfoo.bar-1.tar")
        );
    }

    #[test]
    fn test_find_archive_name_none() {
        assert_eq!(find_archive_name(["nothing here", "bar-1.tar"], "foo"), None);
    }

    #[test]
    fn test_resolve_deterministic_name() {
        let (_temp, work, sources) = setup();
        let tool = FixedSourceDir(sources.clone());
        let commit = CommitId::from("1a2b3c4d");

        let handle = ArchiveResolver::new(&tool)
            .resolve("foo", &work, &commit, &TouchProvider, None)
            .unwrap();

        assert_eq!(handle.name, "foo-1a2b3c4d.tar");
        assert_eq!(handle.dir, sources);
        assert!(handle.path().is_file());
    }

    #[test]
    fn test_resolve_custom_command_moves_archive() {
        let (_temp, work, sources) = setup();
        let tool = FixedSourceDir(sources.clone());
        let commit = CommitId::from("1a2b3c4d");
        let cmd = "touch foo-snap.tar.gz && echo 'created foo-snap.tar.gz'";

        let handle = ArchiveResolver::new(&tool)
            .resolve("foo", &work, &commit, &TouchProvider, Some(cmd))
            .unwrap();

        assert_eq!(handle.name, "foo-snap.tar.gz");
        assert!(sources.join("foo-snap.tar.gz").is_file());
        assert!(!work.join("foo-snap.tar.gz").exists());
    }

    #[test]
    fn test_resolve_custom_command_without_name() {
        let (_temp, work, sources) = setup();
        let tool = FixedSourceDir(sources);
        let commit = CommitId::from("1a2b3c4d");

        let result = ArchiveResolver::new(&tool).resolve(
            "foo",
            &work,
            &commit,
            &TouchProvider,
            Some("echo nothing"),
        );
        assert!(matches!(result, Err(CoreError::ArchiveNotFound { .. })));
    }

    #[test]
    fn test_resolve_custom_command_names_absent_file() {
        let (_temp, work, sources) = setup();
        let tool = FixedSourceDir(sources);
        let commit = CommitId::from("1a2b3c4d");

        let result = ArchiveResolver::new(&tool).resolve(
            "foo",
            &work,
            &commit,
            &TouchProvider,
            Some("echo foo-ghost.tar.gz"),
        );
        assert!(matches!(result, Err(CoreError::ArchiveMissing { .. })));
    }
}
