//! End-to-end CLI integration tests.
//!
//! These tests run the srpmbot binary against temporary configuration files
//! and, where needed, throwaway git repositories.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use git2::{Repository, Signature};
use predicates::prelude::*;
use tempfile::TempDir;

fn srpmbot() -> Command {
    let mut cmd = Command::cargo_bin("srpmbot").expect("srpmbot binary should be built");
    cmd.env_remove("RUST_LOG").env_remove("SRPMBOT_CONFIG");
    cmd
}

fn write_config(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("srpmbot.toml");
    fs::write(&path, content).expect("failed to write config");
    path
}

/// Creates an upstream repository with one commit and returns its short id.
fn create_upstream(path: &Path) -> String {
    let repo = Repository::init(path).expect("failed to init upstream");
    fs::write(path.join("README"), "hello\n").expect("failed to write file");

    let mut index = repo.index().expect("failed to open index");
    index
        .add_path(Path::new("README"))
        .expect("failed to stage file");
    index.write().expect("failed to write index");
    let tree_id = index.write_tree().expect("failed to write tree");
    let tree = repo.find_tree(tree_id).expect("failed to find tree");
    let sig = Signature::now("Test User", "test@example.com").expect("invalid signature");
    let oid = repo
        .commit(Some("HEAD"), &sig, &sig, "Initial commit", &tree, &[])
        .expect("failed to commit");

    oid.to_string()[..8].to_string()
}

#[test]
fn test_help_lists_flags() {
    srpmbot()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--srpm-only"))
        .stdout(predicate::str::contains("--no-monitoring"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_missing_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    srpmbot()
        .arg("--config")
        .arg(temp_dir.path().join("missing.toml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load configuration"));
}

#[test]
fn test_missing_username_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "[main]\nemail = \"jane@example.com\"\n");

    srpmbot()
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("username"));
}

#[test]
fn test_no_projects_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        "[main]\nusername = \"Jane Doe\"\nemail = \"jane@example.com\"\n",
    );

    srpmbot()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to submit"));
}

#[test]
fn test_config_from_environment() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        "[main]\nusername = \"Jane Doe\"\nemail = \"jane@example.com\"\n",
    );

    srpmbot()
        .env("SRPMBOT_CONFIG", &config)
        .arg("--srpm-only")
        .assert()
        .success();
}

#[test]
fn test_failing_project_does_not_abort_run() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(
        temp_dir.path(),
        r#"[main]
username = "Jane Doe"
email = "jane@example.com"

[broken]
scm = "svn"
spec_file = "/srv/broken.spec"

[incomplete]
git_url = "https://example.com/incomplete.git"
"#,
    );

    srpmbot()
        .arg("--config")
        .arg(&config)
        .arg("--srpm-only")
        .assert()
        .success()
        .stdout(predicate::str::contains("unknown scm backend: svn"))
        .stdout(predicate::str::contains("git_folder"));
}

#[test]
fn test_unchanged_project_is_skipped() {
    let temp_dir = TempDir::new().unwrap();
    let upstream = temp_dir.path().join("upstream");
    let commit = create_upstream(&upstream);
    let working_copy = temp_dir.path().join("guake");
    Repository::clone(upstream.to_str().unwrap(), &working_copy).unwrap();

    let spec = temp_dir.path().join("guake.spec");
    fs::write(&spec, "Version: 1.0\nRelease: 1%{?dist}\n").unwrap();
    let content = format!(
        r#"[main]
username = "Jane Doe"
email = "jane@example.com"

[guake]
git_folder = "{}"
git_url = "{}"
spec_file = "{}"
git_hash = "{commit}"
"#,
        working_copy.display(),
        upstream.display(),
        spec.display(),
    );
    let config = write_config(temp_dir.path(), &content);

    srpmbot()
        .arg("--config")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("no new commit"));

    assert_eq!(
        fs::read_to_string(&spec).unwrap(),
        "Version: 1.0\nRelease: 1%{?dist}\n"
    );
    assert_eq!(fs::read_to_string(&config).unwrap(), content);
}
