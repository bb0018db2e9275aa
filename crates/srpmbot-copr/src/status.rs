//! Build identifiers and states.

use std::fmt;

/// Identifier of a build on the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuildId(pub u64);

impl fmt::Display for BuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State of a submitted build.
///
/// `Submitted` and `Running` are transient; the other states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildStatus {
    Submitted,
    Running,
    Succeeded,
    Failed,
    Skipped,
}

impl BuildStatus {
    /// Maps a Copr build state name.
    #[must_use]
    pub fn from_state(state: &str) -> Self {
        match state.trim().to_ascii_lowercase().as_str() {
            "succeeded" | "forked" => Self::Succeeded,
            "failed" | "canceled" | "cancelled" => Self::Failed,
            "skipped" => Self::Skipped,
            "running" | "starting" => Self::Running,
            // importing, pending, waiting, ...
            _ => Self::Submitted,
        }
    }

    /// Returns true once the build will not change state anymore.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed | Self::Skipped)
    }

    /// Returns the lowercase name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submitted => "submitted",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
        }
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
