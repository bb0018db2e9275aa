//! Configuration loader and write-back.

use std::path::{Path, PathBuf};

use toml_edit::{DocumentMut, value};
use tracing::debug;

use crate::{Config, ConfigError, ConfigResult, ProjectConfig};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "srpmbot.toml";

/// Returns the default configuration path in the user's config directory.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates configuration from the given path.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if required
/// keys of the `[main]` section are missing.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<Config> {
    let path = path.as_ref();
    debug!(?path, "loading configuration");

    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    config.validate()?;

    Ok(config)
}

/// Stores `commit` as the last processed commit of `project`.
///
/// Comments and formatting of the rest of the file are preserved.
///
/// # Errors
///
/// Returns an error if the file cannot be read, parsed or written, or if it
/// has no table for `project`.
pub fn record_commit(
    path: impl AsRef<Path>,
    project: &str,
    scm: &str,
    commit: &str,
) -> ConfigResult<()> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let mut doc: DocumentMut = content.parse()?;

    let table = doc
        .get_mut(project)
        .and_then(|item| item.as_table_like_mut())
        .ok_or_else(|| ConfigError::Invalid(format!("no [{project}] section")))?;
    let key = ProjectConfig::hash_key(scm);
    table.insert(&key, value(commit));

    std::fs::write(path, doc.to_string())?;
    debug!(project, key = %key, commit, "recorded commit");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const VALID: &str = r#"
# srpmbot configuration
[main]
username = "Jane Packager"
email = "jane@example.com"

[guake]
git_folder = "/srv/guake"  # working copy
spec_file = "/srv/guake.spec"
"#;

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_config_file_name() {
        assert_eq!(CONFIG_FILE_NAME, "srpmbot.toml");
    }

    #[test]
    fn test_load_config_not_found() {
        let result = load_config("/nonexistent/path/srpmbot.toml");
        match result {
            Err(ConfigError::NotFound(path)) => {
                assert!(path.to_string_lossy().contains("srpmbot.toml"));
            }
            _ => panic!("Expected NotFound error"),
        }
    }

    #[test]
    fn test_load_config_valid() {
        let (_temp_dir, path) = write_config(VALID);
        let config = load_config(&path).unwrap();
        assert_eq!(config.main.email, "jane@example.com");
        assert_eq!(config.projects["guake"].folder("git"), Some("/srv/guake"));
    }

    #[test]
    fn test_load_config_missing_email() {
        let (_temp_dir, path) = write_config("[main]\nusername = \"x\"\n");
        let result = load_config(&path);
        assert!(matches!(
            result,
            Err(ConfigError::MissingKey { key: "email", .. })
        ));
    }

    #[test]
    fn test_load_config_invalid_toml() {
        let (_temp_dir, path) = write_config("this is not valid toml [[[");
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::InvalidToml(_))
        ));
    }

    #[test]
    fn test_record_commit_round_trip() {
        let (_temp_dir, path) = write_config(VALID);
        record_commit(&path, "guake", "git", "1a2b3c4d").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.projects["guake"].hash("git"), Some("1a2b3c4d"));
    }

    #[test]
    fn test_record_commit_overwrites_and_keeps_comments() {
        let (_temp_dir, path) = write_config(VALID);
        record_commit(&path, "guake", "git", "1a2b3c4d").unwrap();
        record_commit(&path, "guake", "git", "5e6f7a8b").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("# srpmbot configuration"));
        assert!(content.contains("# working copy"));
        assert!(content.contains("git_hash = \"5e6f7a8b\""));
        assert!(!content.contains("1a2b3c4d"));
    }

    #[test]
    fn test_record_commit_unknown_project() {
        let (_temp_dir, path) = write_config(VALID);
        let result = record_commit(&path, "missing", "git", "1a2b3c4d");
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
