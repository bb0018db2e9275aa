//! Extra source files.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::{CoreResult, expand_tilde};

/// Copies every file matching `patterns` into `dest_dir`.
///
/// Patterns may start with `~`. A pattern matching nothing is logged and
/// skipped. Returns the copied destinations.
///
/// # Errors
///
/// Returns an error for an invalid pattern or a failed copy.
pub fn copy_patches(patterns: &[String], dest_dir: &Path) -> CoreResult<Vec<PathBuf>> {
    let mut copied = Vec::new();

    for pattern in patterns {
        let expanded = expand_tilde(pattern);
        let mut matched = false;

        for entry in glob::glob(&expanded.to_string_lossy())? {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    warn!(error = %e, "unreadable patch path");
                    continue;
                }
            };
            let Some(file_name) = path.file_name() else {
                continue;
            };
            if !path.is_file() {
                continue;
            }

            let dest = dest_dir.join(file_name);
            debug!(from = %path.display(), to = %dest.display(), "copying patch");
            fs::copy(&path, &dest)?;
            copied.push(dest);
            matched = true;
        }

        if !matched {
            info!(pattern = %pattern, "patch pattern matched no file");
        }
    }

    Ok(copied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_copy_patches_glob() {
        let temp_dir = TempDir::new().unwrap();
        let patches = temp_dir.path().join("patches");
        let dest = temp_dir.path().join("SOURCES");
        fs::create_dir_all(&patches).unwrap();
        fs::create_dir_all(&dest).unwrap();
        fs::write(patches.join("0001-fix.patch"), "a").unwrap();
        fs::write(patches.join("0002-feature.patch"), "b").unwrap();
        fs::write(patches.join("README"), "c").unwrap();

        let pattern = format!("{}/*.patch", patches.display());
        let copied = copy_patches(&[pattern], &dest).unwrap();

        assert_eq!(copied.len(), 2);
        assert_eq!(fs::read_to_string(dest.join("0001-fix.patch")).unwrap(), "a");
        assert!(dest.join("0002-feature.patch").is_file());
        assert!(!dest.join("README").exists());
    }

    #[test]
    fn test_copy_patches_no_match() {
        let temp_dir = TempDir::new().unwrap();
        let pattern = format!("{}/missing/*.patch", temp_dir.path().display());
        let copied = copy_patches(&[pattern], temp_dir.path()).unwrap();
        assert!(copied.is_empty());
    }

    #[test]
    fn test_copy_patches_invalid_pattern() {
        let temp_dir = TempDir::new().unwrap();
        let result = copy_patches(&["[".to_string()], temp_dir.path());
        assert!(matches!(result, Err(crate::CoreError::Pattern(_))));
    }
}
