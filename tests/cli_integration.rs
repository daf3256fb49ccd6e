//! CLI integration tests for pyprobe.
//!
//! These tests only exercise surfaces that do not require a live Python
//! installation: argument handling, config validation, fatal init paths,
//! and completion generation. Probe behavior against canned interpreter
//! output is covered by the unit tests.

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the pyprobe binary command.
fn pyprobe() -> Command {
    Command::cargo_bin("pyprobe").unwrap()
}

/// Create a temporary directory for test fixtures.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// argument surface
// ============================================================================

#[test]
fn test_help_lists_subcommands() {
    pyprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("flags"))
        .stdout(predicate::str::contains("doctor"))
        .stdout(predicate::str::contains("completions"));
}

#[test]
fn test_completions_generate_for_bash() {
    pyprobe()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pyprobe"));
}

#[test]
fn test_invalid_min_rejected_by_clap() {
    pyprobe()
        .args(["flags", "--min", "three.eight"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid python version"));
}

// ============================================================================
// config validation
// ============================================================================

#[test]
fn test_unrecognized_config_key_rejected() {
    let tmp = temp_dir();
    let config = tmp.path().join("python.toml");
    fs::write(&config, "includes = \"/usr/include\"\n").unwrap();

    pyprobe()
        .args(["flags", "--config"])
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized key `includes`"));
}

// ============================================================================
// fatal init paths
// ============================================================================

#[test]
fn test_missing_home_bin_fails_naming_the_directory() {
    let tmp = temp_dir();
    let home = tmp.path().join("pyhome");
    fs::create_dir(&home).unwrap();

    let expected = home.join("bin");
    pyprobe()
        .arg("flags")
        .env("PYTHON3_HOME", &home)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(expected.to_string_lossy().to_string()));
}

#[cfg(unix)]
#[test]
fn test_missing_config_tool_exits_with_status_2() {
    // An empty PATH hides python3-config (and the interpreter, which is
    // not fatal by itself); on platforms that expect the config tool,
    // init must terminate with status 2 before any compile/link output.
    let tmp = temp_dir();
    let empty = tmp.path().join("empty");
    fs::create_dir(&empty).unwrap();

    pyprobe()
        .arg("flags")
        .env("PATH", &empty)
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("config tool not found"))
        .stdout(predicate::str::contains("# Compile flags").not());
}
