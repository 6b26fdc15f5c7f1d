//! Smoke tests for the shopcheck CLI
//!
//! These run the binary without a browser or network: argument handling,
//! listings and the failure paths that stop before a session starts.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the shopcheck binary
fn shopcheck() -> Command {
    let mut cmd = Command::cargo_bin("shopcheck").expect("shopcheck binary should exist");
    for var in [
        "SHOPCHECK_CONFIG",
        "SHOPCHECK_CREDENTIALS",
        "SHOPCHECK_REPORT",
        "SHOPCHECK_BASE_URL",
        "SHOPCHECK_CHROMIUM",
        "SHOPCHECK_WAIT_TIMEOUT_MS",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    shopcheck()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    shopcheck()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("scenarios"))
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("api"));
}

#[test]
fn test_no_args_fails() {
    // A subcommand is required
    shopcheck().assert().failure();
}

#[test]
fn test_run_subcommand_help() {
    shopcheck()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--scenario"))
        .stdout(predicate::str::contains("--credentials"))
        .stdout(predicate::str::contains("--headed"));
}

// ============================================================================
// Scenario listing
// ============================================================================

#[test]
fn test_scenarios_lists_every_name() {
    let assert = shopcheck().arg("scenarios").assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    for name in [
        "login-valid",
        "add-all-to-cart",
        "cart-validation",
        "checkout",
        "checkout-blank-field",
        "end-to-end",
    ] {
        assert!(stdout.contains(name), "missing {name}");
    }
}

// ============================================================================
// Failure paths
// ============================================================================

#[test]
fn test_unknown_scenario_fails() {
    let dir = TempDir::new().unwrap();
    shopcheck()
        .args(["run", "--scenario", "refund", "--report"])
        .arg(dir.path().join("report.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown scenario: refund"));
}

#[test]
fn test_bad_base_url_fails_before_launch() {
    let dir = TempDir::new().unwrap();
    shopcheck()
        .args(["run", "--base-url", "not-a-url", "--report"])
        .arg(dir.path().join("report.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_malformed_credentials_file_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("testdata.json");
    fs::write(&path, "{ not json").unwrap();
    shopcheck()
        .args(["run", "--credentials"])
        .arg(&path)
        .arg("--report")
        .arg(dir.path().join("report.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_unknown_api_check_fails() {
    let dir = TempDir::new().unwrap();
    shopcheck()
        .args(["api", "--check", "refunds", "--report"])
        .arg(dir.path().join("api.txt"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("refunds"));
}
