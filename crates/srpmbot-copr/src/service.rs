//! Build service trait.

use std::path::Path;

use crate::{BuildId, BuildStatus, CoprResult};

/// A remote service that builds source packages.
pub trait BuildService {
    /// Submits `srpm` to be built in `target`.
    ///
    /// # Errors
    ///
    /// Returns an error if the package cannot be uploaded or is rejected.
    fn submit(&self, target: &str, srpm: &Path) -> CoprResult<BuildId>;

    /// Queries the current state of a build.
    ///
    /// # Errors
    ///
    /// Returns an error if the service cannot be reached or does not know
    /// the build.
    fn status(&self, build: BuildId) -> CoprResult<BuildStatus>;
}
