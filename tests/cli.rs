use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn create_test_file(dir: &Path, name: &str, content: &str) {
    let file_path = dir.join(name);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(file_path, content).unwrap();
}

fn setup_test_directory() -> TempDir {
    let dir = TempDir::new().unwrap();
    create_test_file(dir.path(), "a.go", "package a\n\nfunc f() { // BUG: null deref\n}\n");
    create_test_file(dir.path(), "b.go", "// TODO: refactor\npackage b\n");
    dir
}

/// Run the binary inside `home` so no user config is discovered
fn universalist(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("universalist").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_scan_groups_by_keyword() {
    let dir = setup_test_directory();

    universalist(dir.path())
        .args(["scan", "--no-color"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("TODO\n  - refactor\tb.go:1\n"))
        .stdout(predicate::str::contains("BUG\n  - null deref\ta.go:3\n"))
        .stdout(predicate::str::contains("FIXME").not());
}

#[test]
fn test_scan_defaults_to_current_directory() {
    let dir = setup_test_directory();

    universalist(dir.path())
        .args(["scan", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("b.go:1"));
}

#[test]
fn test_scan_missing_root_fails() {
    let dir = TempDir::new().unwrap();

    universalist(dir.path())
        .args(["scan", "does-not-exist"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("does-not-exist"));
}

#[test]
fn test_scan_with_config_overlay() {
    let dir = setup_test_directory();
    create_test_file(dir.path(), "c.go", "// HACK: temporary\n");
    create_test_file(
        dir.path(),
        "overlay.json",
        r#"{
            "keywords": [{"text": "HACK", "color": "green", "priority": 1}],
            "excluded": ["./b.go"]
        }"#,
    );

    universalist(dir.path())
        .args(["scan", "--no-color", "--config", "overlay.json", "."])
        .assert()
        .success()
        .stdout(predicate::str::contains("HACK\n  - temporary\tc.go:1"))
        .stdout(predicate::str::contains("TODO").not())
        .stdout(predicate::str::contains("BUG").not());
}

#[test]
fn test_scan_malformed_config_fails() {
    let dir = setup_test_directory();
    create_test_file(dir.path(), "broken.json", "{ keywords: ");

    universalist(dir.path())
        .args(["scan", "--config", "broken.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load configuration"));
}

#[test]
fn test_scan_invalid_exclusion_fails() {
    let dir = setup_test_directory();
    create_test_file(dir.path(), "overlay.json", r#"{"excluded": ["[oops"]}"#);

    universalist(dir.path())
        .args(["scan", "--config", "overlay.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[oops"));
}

#[test]
fn test_scan_type_filter() {
    let dir = setup_test_directory();

    universalist(dir.path())
        .args(["scan", "--no-color", "--type", "bug"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a.go:3"))
        .stdout(predicate::str::contains("b.go").not());
}

#[test]
fn test_scan_json_output_file() {
    let dir = setup_test_directory();
    let report_path = dir.path().join("report.json");

    universalist(dir.path())
        .args(["scan", "--format", "json", "--output"])
        .arg(&report_path)
        .arg(dir.path())
        .assert()
        .success();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["total_count"], 2);
    assert_eq!(report["by_file"]["a.go"], 1);
}

#[test]
fn test_scan_aligned_output() {
    let dir = setup_test_directory();

    universalist(dir.path())
        .args(["scan", "--no-color", "--align"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Instruction"))
        .stdout(predicate::str::contains("refactor"));
}

#[test]
fn test_init_writes_default_config() {
    let dir = TempDir::new().unwrap();

    universalist(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains(".universalist.json"));

    let written = fs::read_to_string(dir.path().join(".universalist.json")).unwrap();
    assert!(written.contains("URGENT"));

    universalist(dir.path())
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
}
