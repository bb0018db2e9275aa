//! Source package tooling.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use srpmbot_scm::process::{run_command, run_command_with_env};
use tracing::debug;

use crate::{CoreError, CoreResult};

const WROTE_MARKER: &str = "Wrote:";

/// The packaging toolchain used to locate sources and build source RPMs.
pub trait PackageTool {
    /// Returns the directory where `rpmbuild` looks for sources.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be determined.
    fn source_dir(&self) -> CoreResult<PathBuf>;

    /// Builds a source RPM from `spec_file` and returns its path.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::SrpmBuildFailed`] when the build fails.
    fn build_srpm(&self, spec_file: &Path) -> CoreResult<PathBuf>;
}

/// [`PackageTool`] backed by the `rpm` and `rpmbuild` commands.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpmTool;

impl RpmTool {
    /// Creates a new tool.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PackageTool for RpmTool {
    fn source_dir(&self) -> CoreResult<PathBuf> {
        let output = run_command("rpm", ["-E", "%_sourcedir"])?;
        let output = output.into_result("rpm -E %_sourcedir")?;
        let dir = output.stdout.trim();
        if dir.is_empty() || dir.contains("%{") {
            return Err(CoreError::SourceDir(format!("unexpanded value {dir:?}")));
        }
        debug!(dir, "rpm source directory");
        Ok(PathBuf::from(dir))
    }

    fn build_srpm(&self, spec_file: &Path) -> CoreResult<PathBuf> {
        debug!(spec = %spec_file.display(), "building source rpm");
        let output = run_command_with_env(
            "rpmbuild",
            [OsStr::new("-bs"), spec_file.as_os_str()],
            &[("LANG", "C")],
        )?;
        if !output.success() {
            return Err(CoreError::SrpmBuildFailed {
                stdout: output.stdout.trim().to_string(),
                stderr: output.stderr.trim().to_string(),
            });
        }

        parse_written_path(&output.stdout)
            .ok_or_else(|| CoreError::SrpmNotReported(output.stdout.trim().to_string()))
    }
}

/// Extracts the package path from `rpmbuild` output (`Wrote: <path>`).
#[must_use]
pub fn parse_written_path(output: &str) -> Option<PathBuf> {
    output
        .lines()
        .filter_map(|line| line.split_once(WROTE_MARKER))
        .map(|(_, path)| path.trim())
        .rfind(|path| !path.is_empty())
        .map(PathBuf::from)
}
