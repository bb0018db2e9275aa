//! Configuration schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Name of the section holding global settings.
pub const MAIN_SECTION: &str = "main";

/// Main configuration structure: a `[main]` table plus one table per project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Global settings.
    #[serde(default)]
    pub main: MainConfig,

    /// Managed projects, keyed by package name.
    #[serde(flatten)]
    pub projects: BTreeMap<String, ProjectConfig>,
}

impl Config {
    /// Checks the keys every run needs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingKey`] if `username` or `email` is missing.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.main.username.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: MAIN_SECTION,
                key: "username",
            });
        }
        if self.main.email.trim().is_empty() {
            return Err(ConfigError::MissingKey {
                section: MAIN_SECTION,
                key: "email",
            });
        }
        Ok(())
    }
}

/// The `[main]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MainConfig {
    /// Packager name used in changelog entries.
    #[serde(default)]
    pub username: String,

    /// Packager email used in changelog entries.
    #[serde(default)]
    pub email: String,

    /// Base URL of the Copr instance.
    #[serde(default)]
    pub copr_url: Option<String>,
}

/// One managed project.
///
/// Folder, URL and hash keys are prefixed with the backend marker
/// (`git_folder`, `hg_url`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Version control backend (`git` or `hg`).
    pub scm: Option<String>,

    pub git_folder: Option<String>,
    pub git_url: Option<String>,
    pub git_hash: Option<String>,

    pub hg_folder: Option<String>,
    pub hg_url: Option<String>,
    pub hg_hash: Option<String>,

    /// Path of the RPM spec file.
    pub spec_file: Option<String>,

    /// Custom command producing the source archive.
    pub archive_cmd: Option<String>,

    /// Comma-separated glob patterns of extra files to copy into the sources.
    pub patch_files: Option<String>,

    /// Copr project to build in, when it differs from the package name.
    pub copr: Option<String>,
}

impl ProjectConfig {
    /// Returns the working copy folder for the backend.
    #[must_use]
    pub fn folder(&self, scm: &str) -> Option<&str> {
        match scm {
            "git" => self.git_folder.as_deref(),
            "hg" => self.hg_folder.as_deref(),
            _ => None,
        }
    }

    /// Returns the upstream URL for the backend.
    #[must_use]
    pub fn url(&self, scm: &str) -> Option<&str> {
        match scm {
            "git" => self.git_url.as_deref(),
            "hg" => self.hg_url.as_deref(),
            _ => None,
        }
    }

    /// Returns the last processed commit for the backend.
    #[must_use]
    pub fn hash(&self, scm: &str) -> Option<&str> {
        match scm {
            "git" => self.git_hash.as_deref(),
            "hg" => self.hg_hash.as_deref(),
            _ => None,
        }
        .filter(|h| !h.trim().is_empty())
    }

    /// Key under which the last processed commit is stored.
    #[must_use]
    pub fn hash_key(scm: &str) -> String {
        format!("{scm}_hash")
    }

    /// Splits `patch_files` into individual patterns.
    #[must_use]
    pub fn patch_patterns(&self) -> Vec<String> {
        self.patch_files
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect()
    }
}
