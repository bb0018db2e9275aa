//! In-place spec file update.
//!
//! The file is rewritten line by line. Only the `Release:`, `Source0:` and
//! `%changelog` lines are touched; everything else is written back verbatim.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::{ReleaseState, SpecError, SpecResult};

const VERSION_TAG: &str = "Version:";
const RELEASE_TAG: &str = "Release:";
const SOURCE0_TAG: &str = "Source0:";
const CHANGELOG_MARKER: &str = "%changelog";

/// Everything needed to move a spec file to a new upstream snapshot.
#[derive(Debug, Clone)]
pub struct SpecUpdate<'a> {
    /// Commit identifier of the snapshot.
    pub commit: &'a str,
    /// File name of the regenerated source archive.
    pub archive_name: &'a str,
    /// Backend marker (`git`, `hg`).
    pub backend_tag: &'a str,
    /// Packager name for the changelog entry.
    pub packager: &'a str,
    /// Packager email for the changelog entry.
    pub email: &'a str,
    /// Date stamped into the release and the changelog.
    pub date: NaiveDate,
}

impl SpecUpdate<'_> {
    /// The `<YYYYMMDD><tag><commit>` token appended to the release number.
    #[must_use]
    pub fn snapshot(&self) -> String {
        format!(
            "{}{}{}",
            self.date.format("%Y%m%d"),
            self.backend_tag,
            self.commit
        )
    }
}

/// What changed in the spec file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecChange {
    /// Package version read from the `Version:` line.
    pub version: String,
    /// The new `Release:` value.
    pub release: String,
}

/// Rewrites the spec file at `path` for the given snapshot.
///
/// # Errors
///
/// Returns [`SpecError::AlreadyUpToDate`] if the release already names the
/// commit, in which case the file is left untouched. Returns other errors if
/// the file cannot be read, parsed or written.
pub fn update_spec(path: &Path, update: &SpecUpdate<'_>) -> SpecResult<SpecChange> {
    debug!(path = %path.display(), "updating spec file");
    if !path.exists() {
        return Err(SpecError::NotFound(path.to_path_buf()));
    }

    let content = fs::read_to_string(path)?;
    let (new_content, change) = rewrite_spec(&content, update)?;
    fs::write(path, new_content)?;

    info!(path = %path.display(), release = %change.release, "spec file updated");
    Ok(change)
}

/// Computes the updated spec content without touching the filesystem.
///
/// # Errors
///
/// See [`update_spec`].
pub fn rewrite_spec(content: &str, update: &SpecUpdate<'_>) -> SpecResult<(String, SpecChange)> {
    let snapshot = update.snapshot();
    let mut output: Vec<String> = Vec::new();
    let mut version: Option<String> = None;
    // Bumped release number (without snapshot or dist) and the full new value.
    let mut release: Option<(String, String)> = None;
    let mut changelog_seen = false;

    for row in content.lines() {
        if let Some(value) = row.strip_prefix(VERSION_TAG) {
            version = Some(value.trim().to_string());
        }

        if let Some(value) = row.strip_prefix(RELEASE_TAG) {
            if row.contains(update.commit) {
                return Err(SpecError::AlreadyUpToDate {
                    commit: update.commit.to_string(),
                });
            }
            debug!(line = row, "release line before");
            let state = ReleaseState::parse(value, update.backend_tag);
            let number = state.bumped()?;
            let next = state.next(&snapshot)?;
            let line = format!("{RELEASE_TAG}        {next}");
            debug!(line = %line, "release line after");
            output.push(line);
            release = Some((number, next));
            continue;
        }

        if row.starts_with(SOURCE0_TAG) {
            output.push(format!("{SOURCE0_TAG}        {}", update.archive_name));
            continue;
        }

        if row.starts_with(CHANGELOG_MARKER) {
            let version = version
                .as_deref()
                .ok_or(SpecError::MissingField(VERSION_TAG))?;
            let (number, _) = release
                .as_ref()
                .ok_or(SpecError::MissingField(RELEASE_TAG))?;
            output.push(row.to_string());
            output.push(format!(
                "* {} {} <{}> - {version}-{number}.{snapshot}",
                update.date.format("%a %b %d %Y"),
                update.packager,
                update.email,
            ));
            output.push(format!(
                "- Update to {}: {}",
                update.backend_tag, update.commit
            ));
            output.push(String::new());
            changelog_seen = true;
            continue;
        }

        output.push(row.to_string());
    }

    let Some((_, release)) = release else {
        return Err(SpecError::MissingField(RELEASE_TAG));
    };
    if !changelog_seen {
        warn!("no %changelog section, release bumped without a changelog entry");
    }

    let mut new_content = String::with_capacity(content.len() + 128);
    for row in &output {
        new_content.push_str(row);
        new_content.push('\n');
    }

    let change = SpecChange {
        version: version.unwrap_or_default(),
        release,
    };
    Ok((new_content, change))
}
