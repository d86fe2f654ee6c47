//! Integration tests for the castplay binary

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use super::helpers::{fixtures_dir, temp_fixture};

fn castplay() -> Command {
    let mut cmd = Command::cargo_bin("castplay").expect("Binary should be built");
    cmd.env_remove("CASTPLAY_LOG");
    cmd
}

/// Command with the config directory pointed at an empty temp dir.
fn castplay_isolated(config_home: &TempDir) -> Command {
    let mut cmd = castplay();
    cmd.env("XDG_CONFIG_HOME", config_home.path())
        .env("HOME", config_home.path());
    cmd
}

// ============================================================================
// Help Output Tests
// ============================================================================

#[test]
fn help_lists_subcommands() {
    castplay()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("play"))
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("dump"));
}

#[test]
fn play_help_describes_keys() {
    castplay()
        .args(["play", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<FILE>"))
        .stdout(predicate::str::contains("--autoplay"));
}

// ============================================================================
// Info Tests
// ============================================================================

#[test]
fn info_summarizes_recording() {
    let (temp_dir, path) = temp_fixture("sample.cast");

    castplay()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Events:   4"))
        .stdout(predicate::str::contains("Duration: 00:01"))
        .stdout(predicate::str::contains("Terminal: 100x30"))
        .stdout(predicate::str::contains("demo session"));

    drop(temp_dir);
}

#[test]
fn info_shows_recording_date_for_v3() {
    castplay()
        .arg("info")
        .arg(fixtures_dir().join("sample_v3.cast"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded: 2023-11-14"));
}

#[test]
fn info_fails_for_missing_file() {
    castplay()
        .args(["info", "/nonexistent/path/file.cast"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn info_fails_for_malformed_recording() {
    castplay()
        .arg("info")
        .arg(fixtures_dir().join("broken.cast"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load recording"));
}

// ============================================================================
// Dump Tests
// ============================================================================

#[test]
fn dump_writes_prefix_at_position() {
    castplay()
        .arg("dump")
        .arg(fixtures_dir().join("sample.cast"))
        .args(["--at", "1.0"])
        .assert()
        .success()
        .stdout("$ echo hi\r\nhi\r\n");
}

#[test]
fn dump_defaults_to_whole_recording() {
    castplay()
        .arg("dump")
        .arg(fixtures_dir().join("sample.cast"))
        .assert()
        .success()
        .stdout("$ echo hi\r\nhi\r\n$ exit\r\n");
}

#[test]
fn dump_before_first_event_is_empty() {
    castplay()
        .arg("dump")
        .arg(fixtures_dir().join("sample_v3.cast"))
        .args(["--at", "0.2"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn dump_rejects_negative_position() {
    castplay()
        .arg("dump")
        .arg(fixtures_dir().join("sample.cast"))
        .args(["--at=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid position"));
}

// ============================================================================
// Play Tests
// ============================================================================

#[test]
fn play_requires_a_terminal() {
    castplay()
        .arg("play")
        .arg(fixtures_dir().join("sample.cast"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("interactive terminal"));
}

// ============================================================================
// Config Tests
// ============================================================================

#[test]
fn config_path_points_into_config_dir() {
    let config_home = TempDir::new().unwrap();

    castplay_isolated(&config_home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("castplay"))
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn config_show_prints_defaults() {
    let config_home = TempDir::new().unwrap();

    castplay_isolated(&config_home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[player]"))
        .stdout(predicate::str::contains("report_interval_ms = 100"));
}

#[test]
fn completions_generate_for_bash() {
    castplay()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("castplay"));
}
