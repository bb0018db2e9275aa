//! Project descriptors.

use std::path::PathBuf;

use srpmbot_config::ProjectConfig;
use srpmbot_scm::{CommitId, ScmKind};

use crate::{CoreError, CoreResult};

/// Expands a leading `~` to the user's home directory.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (path, Some(home)) if path.starts_with("~/") => home.join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

/// Everything the pipeline needs to know about one managed package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDescriptor {
    /// Package name, also the configuration section name.
    pub name: String,
    /// Version control backend.
    pub scm: ScmKind,
    /// Local working copy.
    pub folder: PathBuf,
    /// Upstream URL, needed only to (re)create the working copy.
    pub url: Option<String>,
    /// RPM spec file.
    pub spec_file: PathBuf,
    /// Commit processed by the last successful run.
    pub last_commit: Option<CommitId>,
    /// Custom archive command.
    pub archive_cmd: Option<String>,
    /// Glob patterns of extra source files.
    pub patch_files: Vec<String>,
    /// Build service target override.
    pub copr: Option<String>,
}

impl ProjectDescriptor {
    /// Resolves a project section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an unknown-backend error for an unsupported `scm` value, and
    /// [`CoreError::MissingOption`] when the folder or spec file is not set, or
    /// when neither the folder exists nor an upstream URL is given.
    pub fn from_config(name: &str, config: &ProjectConfig) -> CoreResult<Self> {
        let scm = ScmKind::from_config(config.scm.as_deref())?;
        let short = scm.short();
        let missing = |option: String| CoreError::MissingOption {
            project: name.to_string(),
            option,
        };

        let folder = config
            .folder(short)
            .map(expand_tilde)
            .ok_or_else(|| missing(format!("{short}_folder")))?;

        let url = config.url(short).map(String::from);
        if url.is_none() && !folder.exists() {
            return Err(missing(format!("{short}_url")));
        }

        let spec_file = config
            .spec_file
            .as_deref()
            .map(expand_tilde)
            .ok_or_else(|| missing("spec_file".to_string()))?;

        Ok(Self {
            name: name.to_string(),
            scm,
            folder,
            url,
            spec_file,
            last_commit: config.hash(short).map(CommitId::from),
            archive_cmd: config.archive_cmd.clone().filter(|c| !c.trim().is_empty()),
            patch_files: config.patch_patterns(),
            copr: config.copr.clone(),
        })
    }

    /// The build service target: the `copr` override or the package name.
    #[must_use]
    pub fn build_target(&self) -> &str {
        self.copr.as_deref().unwrap_or(&self.name)
    }
}
