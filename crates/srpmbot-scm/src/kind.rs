//! Backend selection.

use std::fmt;
use std::str::FromStr;

use crate::{ScmError, ScmResult};

/// The version control systems Srpmbot can track.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScmKind {
    /// Git, the default backend.
    #[default]
    Git,
    /// Mercurial.
    Mercurial,
}

impl ScmKind {
    /// Returns the short marker used in configuration keys and release tags.
    #[must_use]
    pub const fn short(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Mercurial => "hg",
        }
    }

    /// Resolves the backend from an optional `scm` configuration value.
    ///
    /// # Errors
    ///
    /// Returns [`ScmError::UnknownBackend`] for any value other than `git` or `hg`.
    pub fn from_config(value: Option<&str>) -> ScmResult<Self> {
        value.map_or(Ok(Self::default()), str::parse)
    }
}

impl FromStr for ScmKind {
    type Err = ScmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "git" => Ok(Self::Git),
            "hg" => Ok(Self::Mercurial),
            other => Err(ScmError::UnknownBackend(other.to_string())),
        }
    }
}

impl fmt::Display for ScmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_git() {
        assert_eq!(ScmKind::default(), ScmKind::Git);
        assert_eq!(ScmKind::from_config(None).unwrap(), ScmKind::Git);
    }

    #[test]
    fn test_parse_known() {
        assert_eq!("git".parse::<ScmKind>().unwrap(), ScmKind::Git);
        assert_eq!("hg".parse::<ScmKind>().unwrap(), ScmKind::Mercurial);
        assert_eq!(ScmKind::from_config(Some(" hg ")).unwrap(), ScmKind::Mercurial);
    }

    #[test]
    fn test_parse_unknown() {
        let result = ScmKind::from_config(Some("svn"));
        assert!(matches!(result, Err(ScmError::UnknownBackend(name)) if name == "svn"));
    }

    #[test]
    fn test_short_and_display() {
        assert_eq!(ScmKind::Git.short(), "git");
        assert_eq!(ScmKind::Mercurial.to_string(), "hg");
    }
}
