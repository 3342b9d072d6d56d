//! Integration tests for the `nt` CLI.
//!
//! Each test creates a temp workspace directory, runs `nt` as a subprocess,
//! and verifies stdout and/or the exit status.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

/// Create a small notes workspace in the given directory.
fn create_test_workspace(root: &Path) {
    fs::write(
        root.join("inbox.md"),
        "\
# Inbox

- [/] Write report scheduled:2024-03-05 p:2
- [ ] Pay rent due:2024-03-01 p:1
- [ ] Plan trip due:2024-04-01
- [b] Renew passport due:2024-03-04
- [x] Ship release completed:2024-03-05
- [x] Old news completed:2024-02-01
",
    )
    .unwrap();

    fs::write(
        root.join("garden.md"),
        "\
+++
type = \"project\"
status = \"active\"
+++
# Garden

- [ ] Buy seeds
",
    )
    .unwrap();

    fs::write(
        root.join("boat.md"),
        "+++\ntype = \"project\"\nstatus = \"archived\"\nname = \"Boat\"\n+++\n",
    )
    .unwrap();

    // Hidden directories are never indexed
    fs::create_dir_all(root.join(".trash")).unwrap();
    fs::write(root.join(".trash/old.md"), "- [ ] Hidden task due:2024-01-01\n").unwrap();
}

/// Run `nt` against `root` with the date pinned to 2024-03-05.
fn nt(root: &Path, args: &[&str]) -> Output {
    nt_on(root, "2024-03-05", args)
}

fn nt_on(root: &Path, date: &str, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_nt"))
        .arg("--dir")
        .arg(root)
        .args(["--date", date])
        .args(args)
        .env_remove("NOTEDOWN_DIR")
        .env_remove("TEST_DATE")
        .output()
        .unwrap()
}

fn stdout(output: &Output) -> String {
    assert!(
        output.status.success(),
        "nt failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout.clone()).unwrap()
}

#[test]
fn agenda_lists_open_and_finished_work() {
    let dir = TempDir::new().unwrap();
    create_test_workspace(dir.path());

    let out = stdout(&nt(dir.path(), &["agenda"]));
    assert_eq!(
        out,
        "\
Tuesday (2024-03-05)

Doing
  [/] Write report p:2 scheduled:2024-03-05
Todo
  [ ] Pay rent p:1 due:2024-03-01
Blocked
  [b] Renew passport due:2024-03-04

Done
  [x] Ship release
"
    );
}

#[test]
fn agenda_json_output() {
    let dir = TempDir::new().unwrap();
    create_test_workspace(dir.path());

    let out = stdout(&nt(dir.path(), &["agenda", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["date"], "2024-03-05");
    let names: Vec<&str> = value["open"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Doing", "Todo", "Blocked"]);
    assert_eq!(value["open"][1]["items"][0]["due"], "2024-03-01");
    assert_eq!(value["open"][1]["items"][0]["path"], "inbox.md");
}

#[test]
fn pinned_date_moves_the_agenda() {
    let dir = TempDir::new().unwrap();
    create_test_workspace(dir.path());

    let out = stdout(&nt_on(dir.path(), "2024-04-02", &["agenda"]));
    assert!(out.starts_with("Tuesday (2024-04-02)"));
    assert!(out.contains("Plan trip"));
    assert!(!out.contains("Ship release"));
}

#[test]
fn projects_are_grouped_open_then_closed() {
    let dir = TempDir::new().unwrap();
    create_test_workspace(dir.path());

    let out = stdout(&nt(dir.path(), &["projects"]));
    assert_eq!(
        out,
        "Active\n  Garden (garden.md)\n\nArchived\n  Boat (boat.md)\n"
    );
}

#[test]
fn projects_json_output() {
    let dir = TempDir::new().unwrap();
    create_test_workspace(dir.path());

    let out = stdout(&nt(dir.path(), &["projects", "--json"]));
    let value: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(value["open"][0]["items"][0]["name"], "Garden");
    assert_eq!(value["open"][0]["items"][0]["status"], "active");
    assert_eq!(value["closed"][0]["name"], "Archived");
}

#[test]
fn workspace_dir_from_environment() {
    let dir = TempDir::new().unwrap();
    create_test_workspace(dir.path());

    let output = Command::new(env!("CARGO_BIN_EXE_nt"))
        .arg("projects")
        .env("NOTEDOWN_DIR", dir.path())
        .env("TEST_DATE", "2024-03-05")
        .output()
        .unwrap();
    assert!(stdout(&output).contains("Garden"));
}

#[test]
fn missing_dir_is_an_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_nt"))
        .arg("agenda")
        .env_remove("NOTEDOWN_DIR")
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NOTEDOWN_DIR"));
}

#[test]
fn nonexistent_dir_is_an_error() {
    let dir = TempDir::new().unwrap();
    let output = nt(&dir.path().join("missing"), &["agenda"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not a directory"));
}

#[test]
fn broken_config_is_reported() {
    let dir = TempDir::new().unwrap();
    create_test_workspace(dir.path());
    fs::create_dir_all(dir.path().join(".notedown")).unwrap();
    fs::write(dir.path().join(".notedown/task.toml"), "[ui\n").unwrap();

    let output = nt(dir.path(), &["agenda"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("could not parse"));
}
