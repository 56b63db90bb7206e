//! CLI integration tests for doc-hunt
//!
//! These tests drive the binary end to end: workspace setup, config
//! management, status checks and the maintenance commands.

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command instance for the doc-hunt binary
fn doc_hunt_cmd() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("doc-hunt"));
    cmd.env_remove("DOC_HUNT_HOME").env_remove("DOC_HUNT_LOG");
    cmd
}

/// Command running inside `dir`, which is also the workspace
fn in_dir(dir: &Path) -> assert_cmd::Command {
    let mut cmd = doc_hunt_cmd();
    cmd.current_dir(dir);
    cmd
}

/// Create a temporary workspace with a doc and two sources
fn setup_workspace() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("doc.md"), "# Docs").unwrap();
    fs::write(dir.path().join("a.php"), "<?php echo 'a';").unwrap();
    fs::write(dir.path().join("b.php"), "<?php echo 'b';").unwrap();

    in_dir(dir.path()).arg("init").assert().success();
    dir
}

fn canonical(dir: &TempDir, name: &str) -> String {
    dir.path()
        .join(name)
        .canonicalize()
        .unwrap()
        .to_string_lossy()
        .into_owned()
}

fn json_stdout(cmd: &mut assert_cmd::Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    serde_json::from_slice(&output.stdout).unwrap()
}

// =============================================================================
// Workspace Tests
// =============================================================================

#[test]
fn test_init_creates_structure() {
    let dir = TempDir::new().unwrap();

    doc_hunt_cmd()
        .args(["init", "--workspace"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized doc-hunt workspace"));

    assert!(dir.path().join(".doc-hunt").is_dir());
    assert!(dir.path().join(".doc-hunt/doc-hunt.db").is_file());
    assert!(dir.path().join(".doc-hunt/config.toml").is_file());
}

#[test]
fn test_init_is_idempotent() {
    let dir = setup_workspace();
    in_dir(dir.path()).arg("init").assert().success();
}

#[test]
fn test_commands_require_workspace() {
    let dir = TempDir::new().unwrap();

    in_dir(dir.path())
        .arg("check")
        .assert()
        .failure()
        .stderr(predicate::str::contains("doc-hunt init"));
}

#[test]
fn test_workspace_from_env() {
    let workspace = setup_workspace();
    let elsewhere = TempDir::new().unwrap();

    in_dir(elsewhere.path())
        .env("DOC_HUNT_HOME", workspace.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No configs tracked"));
}

#[test]
fn test_workspace_found_from_subdirectory() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();
    let nested = dir.path().join("lib").join("deep");
    fs::create_dir_all(&nested).unwrap();

    in_dir(&nested)
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
    assert!(!nested.join(".doc-hunt").exists());
}

#[test]
fn test_version() {
    doc_hunt_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("v"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_add_and_list() {
    let dir = setup_workspace();

    in_dir(dir.path())
        .args(["config", "add", "doc.md", "b.php,a.php"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tracking 2 source file(s)"));

    let json = json_stdout(in_dir(dir.path()).args(["config", "list", "--format", "json"]));
    assert_eq!(json[0]["index"], 0);
    assert_eq!(json[0]["doc"], canonical(&dir, "doc.md"));
    assert_eq!(json[0]["category"], "file");
    assert_eq!(json[0]["sources"][0], canonical(&dir, "a.php"));
    assert_eq!(json[0]["sources"][1], canonical(&dir, "b.php"));
}

#[test]
fn test_config_add_url_doc() {
    let dir = setup_workspace();

    in_dir(dir.path())
        .args(["config", "add", "https://example.com/guide", "a.php"])
        .assert()
        .success();

    in_dir(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[0] https://example.com/guide (url)"));
}

#[test]
fn test_config_add_folder() {
    let dir = setup_workspace();
    fs::create_dir_all(dir.path().join("src/nested")).unwrap();
    fs::write(dir.path().join("src/one.rs"), "1").unwrap();
    fs::write(dir.path().join("src/nested/two.rs"), "2").unwrap();

    let json = json_stdout(
        in_dir(dir.path()).args(["config", "add", "doc.md", "src", "--format", "json"]),
    );

    let sources = json["sources"].as_array().unwrap();
    assert_eq!(sources.len(), 2);
    assert!(sources.iter().all(|s| s["fingerprint"].as_str().unwrap().len() == 64));
}

#[test]
fn test_config_add_validation_errors() {
    let dir = setup_workspace();

    in_dir(dir.path())
        .args(["config", "add"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing file doc"));

    in_dir(dir.path())
        .args(["config", "add", "whatever"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a valid existing file, nor a valid URL"));

    in_dir(dir.path())
        .args(["config", "add", "doc.md"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Missing file/folder sources"));

    in_dir(dir.path())
        .args(["config", "add", "doc.md", "missing.php"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("File/folder source missing.php doesn't exist"));
}

#[test]
fn test_config_del() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();
    in_dir(dir.path()).args(["config", "add", "doc.md", "b.php"]).assert().success();

    in_dir(dir.path())
        .args(["config", "del", "0,0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 config(s)"));

    let json = json_stdout(in_dir(dir.path()).args(["config", "list", "--format", "json"]));
    assert_eq!(json.as_array().unwrap().len(), 1);
    assert_eq!(json[0]["sources"][0], canonical(&dir, "b.php"));
}

#[test]
fn test_config_del_errors() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();

    in_dir(dir.path())
        .args(["config", "del", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Value 1 is out of bounds"));

    in_dir(dir.path())
        .args(["config", "del", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("x is not a number"));
}

// =============================================================================
// Check Tests
// =============================================================================

#[test]
fn test_check_clean() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php,b.php"]).assert().success();

    in_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stdout(predicate::str::contains("up to date"));
}

#[test]
fn test_check_reports_updated_and_deleted() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php,b.php"]).assert().success();
    let a = canonical(&dir, "a.php");
    let b = canonical(&dir, "b.php");

    fs::write(dir.path().join("a.php"), "whatever").unwrap();
    let json = json_stdout(in_dir(dir.path()).args(["check", "--format", "json"]));
    assert_eq!(json[0]["status"]["updated"], serde_json::json!([a]));
    assert_eq!(json[0]["status"]["untouched"], serde_json::json!([b]));

    fs::remove_file(dir.path().join("a.php")).unwrap();
    in_dir(dir.path())
        .arg("check")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("deleted"))
        .stdout(predicate::str::contains("(1 untouched)"));
}

// =============================================================================
// Maintenance Tests
// =============================================================================

#[test]
fn test_update_acknowledges_changes() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php,b.php"]).assert().success();
    fs::write(dir.path().join("a.php"), "changed").unwrap();

    in_dir(dir.path())
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("Refreshed 1 source(s)"));

    in_dir(dir.path()).arg("check").assert().success();
}

#[test]
fn test_update_prunes_deleted_sources() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();
    in_dir(dir.path()).args(["config", "add", "doc.md", "b.php"]).assert().success();
    fs::remove_file(dir.path().join("a.php")).unwrap();

    in_dir(dir.path())
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("removed 1 deleted source(s)"));

    let json = json_stdout(in_dir(dir.path()).args(["config", "list", "--format", "json"]));
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[test]
fn test_update_json_summary() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();
    in_dir(dir.path()).args(["config", "add", "doc.md", "b.php"]).assert().success();
    let a = canonical(&dir, "a.php");
    let b = canonical(&dir, "b.php");
    fs::write(dir.path().join("a.php"), "changed").unwrap();
    fs::remove_file(dir.path().join("b.php")).unwrap();

    let json = json_stdout(in_dir(dir.path()).args(["update", "--format", "json"]));

    assert_eq!(json["refreshed"], serde_json::json!([a]));
    assert_eq!(json["skipped"], serde_json::json!([]));
    assert_eq!(json["removed"], serde_json::json!([b]));
    assert_eq!(json["removed_docs"], 1);
}

#[test]
fn test_update_keeps_deleted_when_pruning_disabled() {
    let dir = setup_workspace();
    fs::write(dir.path().join(".doc-hunt/config.toml"), "prune_deleted = false\n").unwrap();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();
    fs::remove_file(dir.path().join("a.php")).unwrap();

    in_dir(dir.path()).arg("update").assert().success();
    in_dir(dir.path()).arg("check").assert().code(1);
}

#[test]
fn test_rename_follows_moved_source() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();
    fs::rename(dir.path().join("a.php"), dir.path().join("c.php")).unwrap();

    in_dir(dir.path())
        .args(["rename", "a.php", "c.php"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Renamed 1 tracked source(s)"));

    in_dir(dir.path()).arg("check").assert().success();
}

#[test]
fn test_forget_removes_orphan_doc() {
    let dir = setup_workspace();
    in_dir(dir.path()).args(["config", "add", "doc.md", "a.php"]).assert().success();

    in_dir(dir.path())
        .args(["forget", "a.php"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 source(s) and 1 doc(s)"));

    in_dir(dir.path())
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No configs tracked"));
}
