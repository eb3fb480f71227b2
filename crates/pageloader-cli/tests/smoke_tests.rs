//! Smoke tests for the pageloader CLI
//!
//! These tests run the built binary end to end.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command for the pageloader binary
fn pageloader() -> Command {
    let mut cmd = Command::cargo_bin("pageloader").expect("pageloader binary should exist");
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    pageloader()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.3.0"));
}

#[test]
fn test_help_flag() {
    pageloader()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("plan"))
        .stdout(predicate::str::contains("replay"));
}

#[test]
fn test_no_args_fails() {
    pageloader().assert().failure();
}

// ============================================================================
// Plan
// ============================================================================

#[test]
fn test_plan_text_defaults() {
    pageloader()
        .args(["plan", "--color", "never"])
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Poll plan ==="))
        .stdout(predicate::str::contains("4000 ms"))
        .stdout(predicate::str::contains("5 samples"));
}

#[test]
fn test_plan_json_with_overrides() {
    let output = pageloader()
        .args(["plan", "--preset", "fast", "--threshold-ms", "3000", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["threshold_ms"], 3_000);
    assert_eq!(value["recheck_interval_ms"], 50);
    assert_eq!(value["max_samples"], 61);
}

#[cfg(target_os = "linux")]
#[test]
fn test_plan_json_write_failure_exits_one() {
    let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();
    let output = std::process::Command::new(assert_cmd::cargo::cargo_bin("pageloader"))
        .args(["plan", "--format", "json"])
        .env_remove("RUST_LOG")
        .stdout(full)
        .stderr(std::process::Stdio::piped())
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("I/O error"));
}

#[test]
fn test_plan_from_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "poll.yaml", "threshold_ms: 800\nrecheck_interval_ms: 200\n");
    pageloader()
        .args(["plan", "--format", "json", "--config"])
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"threshold_ms\": 800"))
        .stdout(predicate::str::contains("\"max_samples\": 5"));
}

#[test]
fn test_plan_rejects_zero_interval() {
    pageloader()
        .args(["plan", "--recheck-interval-ms", "0"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("recheck interval must be positive"));
}

// ============================================================================
// Replay
// ============================================================================

#[test]
fn test_replay_size_trace_settles() {
    let dir = TempDir::new().unwrap();
    let trace = write(
        &dir,
        "trace.yaml",
        "- { at_ms: 0, size: 100 }\n- { at_ms: 200, size: 300 }\n- { at_ms: 450, size: 900 }\n",
    );
    pageloader()
        .args(["replay", "--color", "never"])
        .arg(&trace)
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS settled after 900 ms"));
}

#[test]
fn test_replay_timeout_exits_two() {
    let dir = TempDir::new().unwrap();
    let trace = write(&dir, "flat.json", r#"[{"at_ms": 0, "size": 100}]"#);
    pageloader()
        .args(["replay", "--color", "never", "--threshold-ms", "1000"])
        .arg(&trace)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("FAIL not settled within 1000 ms"));
}

#[test]
fn test_replay_loaders_json_output() {
    let dir = TempDir::new().unwrap();
    let trace = write(
        &dir,
        "loaders.json",
        r#"[
            {"at_ms": 0, "loaders": ["displayed", "displayed"]},
            {"at_ms": 700, "loaders": ["hidden", "absent"]}
        ]"#,
    );
    let output = pageloader()
        .args(["replay", "--mode", "loaders", "--format", "json"])
        .arg(&trace)
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["mode"], "loaders");
    assert_eq!(value["settled"], true);
    assert_eq!(value["elapsed_ms"], 700);
}

#[test]
fn test_replay_quiet_still_reports_failure() {
    let dir = TempDir::new().unwrap();
    let trace = write(&dir, "flat.json", r#"[{"at_ms": 0, "size": 1}]"#);
    pageloader()
        .args(["replay", "-q", "--color", "never", "--threshold-ms", "200"])
        .arg(&trace)
        .assert()
        .code(2)
        .stdout(predicate::str::contains("Replay").not())
        .stdout(predicate::str::contains("FAIL"));
}

#[test]
fn test_replay_unknown_extension() {
    let dir = TempDir::new().unwrap();
    let trace = write(&dir, "trace.txt", "");
    pageloader()
        .arg("replay")
        .arg(&trace)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid argument"));
}

#[test]
fn test_replay_empty_trace() {
    let dir = TempDir::new().unwrap();
    let trace = write(&dir, "empty.json", "[]");
    pageloader()
        .arg("replay")
        .arg(&trace)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("trace has no steps"));
}

#[test]
fn test_replay_missing_file() {
    pageloader()
        .args(["replay", "/nonexistent/trace.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("I/O error"));
}
