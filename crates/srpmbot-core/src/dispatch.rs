//! Build submission.

use std::path::PathBuf;

use srpmbot_copr::{BuildId, BuildService};
use tracing::{info, warn};

/// A source package ready to be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltPackage {
    /// Project the package belongs to.
    pub project: String,
    /// Build service target (`project` or `owner/project`).
    pub target: String,
    /// Path of the source RPM.
    pub srpm: PathBuf,
}

/// A build accepted by the build service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildHandle {
    pub id: BuildId,
    pub project: String,
}

/// Submits source packages to a [`BuildService`].
pub struct BuildDispatcher<'a> {
    service: &'a dyn BuildService,
}

impl<'a> BuildDispatcher<'a> {
    #[must_use]
    pub fn new(service: &'a dyn BuildService) -> Self {
        Self { service }
    }

    /// Submits every package and returns the handles of accepted builds.
    ///
    /// A rejected submission is logged and left out of the result.
    pub fn dispatch(&self, packages: &[BuiltPackage]) -> Vec<BuildHandle> {
        let mut handles = Vec::with_capacity(packages.len());

        for package in packages {
            info!(
                project = %package.project,
                target = %package.target,
                srpm = %package.srpm.display(),
                "submitting build"
            );
            match self.service.submit(&package.target, &package.srpm) {
                Ok(id) => {
                    info!(project = %package.project, build = %id, "build created");
                    handles.push(BuildHandle {
                        id,
                        project: package.project.clone(),
                    });
                }
                Err(e) => {
                    warn!(project = %package.project, error = %e, "build submission failed");
                }
            }
        }

        handles
    }
}
