//! Copr credentials file.
//!
//! The file is the one written by `copr-cli`, an INI file such as:
//! ```text
//! [copr-cli]
//! login = abcdefghijklmnop
//! username = jane
//! token = qrstuvwxyz
//! copr_url = https://copr.fedorainfracloud.org
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use tracing::debug;

use crate::{CoprError, CoprResult};

/// Section holding the API credentials.
pub const COPR_SECTION: &str = "copr-cli";

/// Copr instance used when nothing else is configured.
pub const DEFAULT_COPR_URL: &str = "https://copr.fedorainfracloud.org/";

/// API credentials for Copr.
#[derive(Clone, PartialEq, Eq)]
pub struct CoprCredentials {
    /// API login.
    pub login: String,
    /// Account name, the default owner of projects.
    pub username: String,
    /// API token.
    pub token: String,
    /// Instance the credentials belong to.
    pub copr_url: Option<String>,
}

impl std::fmt::Debug for CoprCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoprCredentials")
            .field("username", &self.username)
            .field("copr_url", &self.copr_url)
            .finish_non_exhaustive()
    }
}

impl CoprCredentials {
    /// Returns `~/.config/copr`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("copr"))
    }

    /// Loads credentials from the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CoprError::MissingCredentials`] if the file does not exist and
    /// [`CoprError::InvalidCredentials`] if it cannot be parsed or lacks a key.
    pub fn load(path: &Path) -> CoprResult<Self> {
        debug!(?path, "reading Copr credentials");
        if !path.exists() {
            return Err(CoprError::MissingCredentials(path.to_path_buf()));
        }

        let ini = Ini::load_from_file(path).map_err(|e| CoprError::InvalidCredentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini, path)
    }

    /// Parses credentials from INI text; `path` is only used in errors.
    ///
    /// # Errors
    ///
    /// See [`CoprCredentials::load`].
    pub fn parse(content: &str, path: &Path) -> CoprResult<Self> {
        let ini = Ini::load_from_str(content).map_err(|e| CoprError::InvalidCredentials {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini, path)
    }

    fn from_ini(ini: &Ini, path: &Path) -> CoprResult<Self> {
        let invalid = |reason: String| CoprError::InvalidCredentials {
            path: path.to_path_buf(),
            reason,
        };

        let section = ini
            .section(Some(COPR_SECTION))
            .ok_or_else(|| invalid(format!("no [{COPR_SECTION}] section")))?;
        let required = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
                .ok_or_else(|| invalid(format!("missing `{key}`")))
        };

        Ok(Self {
            login: required("login")?,
            username: required("username")?,
            token: required("token")?,
            copr_url: section
                .get("copr_url")
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from),
        })
    }
}
