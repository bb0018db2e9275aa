//! Per-project source package pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use srpmbot_scm::{CommandOutput, CommitId, SourceProvider};
use srpmbot_spec::{SpecError, SpecUpdate, update_spec};
use tracing::{debug, info, warn};

use crate::{
    ArchiveResolver, CoreError, CoreResult, PackageTool, ProjectDescriptor, copy_patches,
};

/// Identity written into changelog entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packager {
    pub name: String,
    pub email: String,
}

/// How a project run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectOutcome {
    /// A new source package was built.
    Built { srpm: PathBuf, commit: CommitId },
    /// The upstream head is the one processed last time.
    Unchanged { commit: CommitId },
    /// The spec file already refers to the upstream head.
    AlreadyCurrent { commit: CommitId },
}

impl ProjectOutcome {
    /// The upstream commit the run looked at.
    #[must_use]
    pub fn commit(&self) -> &CommitId {
        match self {
            Self::Built { commit, .. } | Self::Unchanged { commit } | Self::AlreadyCurrent { commit } => {
                commit
            }
        }
    }

    /// The built package, if any.
    #[must_use]
    pub fn srpm(&self) -> Option<&Path> {
        match self {
            Self::Built { srpm, .. } => Some(srpm),
            _ => None,
        }
    }

    /// Returns true if the commit should be persisted as the last known one.
    #[must_use]
    pub fn should_record(&self) -> bool {
        matches!(self, Self::Built { .. } | Self::AlreadyCurrent { .. })
    }
}

enum Attempt {
    Finished(ProjectOutcome),
    PullFailed(CommandOutput),
}

/// Runs the source package pipeline for projects of one backend.
pub struct ProjectPipeline<'a> {
    provider: &'a dyn SourceProvider,
    tool: &'a dyn PackageTool,
    packager: &'a Packager,
    date: NaiveDate,
}

impl<'a> ProjectPipeline<'a> {
    /// Creates a pipeline stamping today's date.
    #[must_use]
    pub fn new(
        provider: &'a dyn SourceProvider,
        tool: &'a dyn PackageTool,
        packager: &'a Packager,
    ) -> Self {
        Self {
            provider,
            tool,
            packager,
            date: Local::now().date_naive(),
        }
    }

    /// Overrides the date used in release strings and changelog entries.
    #[must_use]
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    /// Brings the working copy up to date and builds a source package if
    /// upstream moved.
    ///
    /// A failed pull deletes the working copy and starts over once, provided
    /// an upstream URL is available to clone it again.
    ///
    /// # Errors
    ///
    /// Returns an error if any step fails; [`CoreError::PullFailed`] when
    /// pulling fails again after the fresh clone, or fails once for a
    /// working copy without an upstream URL.
    pub fn run(&self, project: &ProjectDescriptor) -> CoreResult<ProjectOutcome> {
        info!(project = %project.name, scm = %project.scm, "generating new source rpm");
        self.provider.init()?;

        let output = match self.attempt(project)? {
            Attempt::Finished(outcome) => return Ok(outcome),
            Attempt::PullFailed(output) => output,
        };

        debug!(stdout = %output.stdout, stderr = %output.stderr, "pull output");
        if project.url.is_none() {
            warn!(
                project = %project.name,
                code = ?output.code,
                "pull failed and no upstream url to re-clone from, keeping the working copy"
            );
            return Err(Self::pull_failed(project, &output));
        }

        warn!(
            project = %project.name,
            code = ?output.code,
            "pull failed, re-cloning the working copy"
        );
        fs::remove_dir_all(&project.folder)?;

        match self.attempt(project)? {
            Attempt::Finished(outcome) => Ok(outcome),
            Attempt::PullFailed(output) => Err(Self::pull_failed(project, &output)),
        }
    }

    fn pull_failed(project: &ProjectDescriptor, output: &CommandOutput) -> CoreError {
        CoreError::PullFailed {
            project: project.name.clone(),
            output: output.lines().collect::<Vec<_>>().join("\n"),
        }
    }

    fn attempt(&self, project: &ProjectDescriptor) -> CoreResult<Attempt> {
        self.ensure_working_copy(project)?;

        let pull = self.provider.pull(&project.folder)?;
        if !pull.success() {
            return Ok(Attempt::PullFailed(pull));
        }

        let commit = self.provider.commit_identifier(&project.folder)?;
        info!(project = %project.name, %commit, "last commit");

        if project.last_commit.as_ref() == Some(&commit) {
            info!(project = %project.name, "no new commit, nothing to build");
            return Ok(Attempt::Finished(ProjectOutcome::Unchanged { commit }));
        }

        let archive = ArchiveResolver::new(self.tool).resolve(
            &project.name,
            &project.folder,
            &commit,
            self.provider,
            project.archive_cmd.as_deref(),
        )?;

        let update = SpecUpdate {
            commit: commit.as_str(),
            archive_name: &archive.name,
            backend_tag: self.provider.tag(),
            packager: &self.packager.name,
            email: &self.packager.email,
            date: self.date,
        };
        match update_spec(&project.spec_file, &update) {
            Ok(change) => {
                info!(version = %change.version, release = %change.release, "spec file updated");
            }
            Err(SpecError::AlreadyUpToDate { .. }) => {
                info!(project = %project.name, "spec file already refers to this commit");
                return Ok(Attempt::Finished(ProjectOutcome::AlreadyCurrent { commit }));
            }
            Err(e) => return Err(e.into()),
        }

        if !project.patch_files.is_empty() {
            let copied = copy_patches(&project.patch_files, &archive.dir)?;
            debug!(count = copied.len(), "patches copied");
        }

        let srpm = self.tool.build_srpm(&project.spec_file)?;
        info!(srpm = %srpm.display(), "source rpm built");
        Ok(Attempt::Finished(ProjectOutcome::Built { srpm, commit }))
    }

    fn ensure_working_copy(&self, project: &ProjectDescriptor) -> CoreResult<()> {
        if project.folder.exists() {
            return Ok(());
        }

        let url = project
            .url
            .as_deref()
            .ok_or_else(|| CoreError::MissingOption {
                project: project.name.clone(),
                option: format!("{}_url", project.scm.short()),
            })?;
        info!(%url, folder = %project.folder.display(), "cloning");
        self.provider.clone_repository(url, &project.folder)?;
        Ok(())
    }
}
