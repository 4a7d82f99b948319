//! Integration tests for lifecycle commands that fail or finish before the
//! provider is reached, plus one run against an unreachable API.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Nothing listens on the discard port, so every API call is refused.
const DEAD_API: &str = "http://127.0.0.1:9/";

fn linodectl(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("linodectl"));
    cmd.env("NO_COLOR", "1")
        .env("LINODECTL_HOME", home.path())
        .env("LINODE_API_KEY", "test-key")
        .env_remove("RUST_LOG");
    cmd
}

/// A home with a `db` cluster holding `db.01` (cached id 7) and an
/// unreachable API configured.
fn seeded_home() -> TempDir {
    let home = TempDir::new().expect("temp dir");
    let registry = json!({
        "db": { "instances": {
            "db.01": {
                "name": "db.01",
                "ip": "198.51.100.7",
                "ssh_key": "overcast.key",
                "ssh_port": "22",
                "user": "root",
                "linode": { "id": 7, "label": "db.01" }
            }
        }},
        "web": { "instances": {} }
    });
    std::fs::write(
        home.path().join("clusters.json"),
        serde_json::to_string_pretty(&registry).unwrap(),
    )
    .unwrap();
    std::fs::write(
        home.path().join("config.yaml"),
        format!("api_url: {DEAD_API}\njobs:\n  interval_secs: 0\n  max_attempts: 2\n"),
    )
    .unwrap();
    home
}

fn registry(home: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(home.join("clusters.json")).unwrap()).unwrap()
}

// --- Credential ---

#[test]
fn test_missing_credential_fails_provider_commands() {
    let home = seeded_home();
    linodectl(&home)
        .env_remove("LINODE_API_KEY")
        .args(["boot", "db.01"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing Linode API key"));
}

#[test]
fn test_missing_credential_json_error_code() {
    let home = seeded_home();
    let assert = linodectl(&home)
        .env_remove("LINODE_API_KEY")
        .args(["--json", "plans"])
        .assert()
        .code(1);
    let v: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "missing_credential");
}

#[test]
fn test_create_validation_runs_before_credential_check() {
    let home = seeded_home();
    let assert = linodectl(&home)
        .env_remove("LINODE_API_KEY")
        .args(["--json", "create", "db.02"])
        .assert()
        .code(1);
    let v: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["code"], "missing_parameter");
}

#[test]
fn test_create_unknown_cluster_reported_before_public_key_read() {
    let home = seeded_home();
    let assert = linodectl(&home)
        .args(["--json", "create", "cache.01", "--cluster", "cache"])
        .args(["--ssh-pub-key", "/nonexistent/key.pub"])
        .assert()
        .code(1);
    let v: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["code"], "unknown_cluster");
}

#[test]
fn test_unknown_instance_reported_before_credential_check() {
    let home = seeded_home();
    let assert = linodectl(&home)
        .env_remove("LINODE_API_KEY")
        .args(["--json", "boot", "nope"])
        .assert()
        .code(1);
    let v: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["code"], "unknown_instance");
}

// --- Create validation ---

#[test]
fn test_create_without_cluster_is_missing_parameter() {
    let home = seeded_home();
    linodectl(&home)
        .args(["create", "db.02"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Missing parameter: --cluster"));
}

#[test]
fn test_create_unknown_cluster_lists_known_clusters() {
    let home = seeded_home();
    let before = registry(home.path());
    linodectl(&home)
        .args(["create", "cache.01", "--cluster", "cache"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "No \"cache\" cluster found. Known clusters are: db, web.",
        ));
    assert_eq!(registry(home.path()), before);
}

#[test]
fn test_create_duplicate_name_json_code() {
    let home = seeded_home();
    let assert = linodectl(&home)
        .args(["--json", "create", "db.01", "--cluster", "db"])
        .assert()
        .code(1);
    let v: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["code"], "duplicate_instance");
}

// --- Resolution ---

#[test]
fn test_unknown_instance_is_reported() {
    let home = seeded_home();
    linodectl(&home)
        .args(["reboot", "nope"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No instance found matching \"nope\""));
}

#[test]
fn test_resize_without_plan_is_missing_parameter() {
    let home = seeded_home();
    linodectl(&home)
        .args(["resize", "db.01"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--plan-id or --plan-slug"));
}

// --- Destroy gate ---

#[test]
fn test_destroy_declined_changes_nothing() {
    let home = seeded_home();
    let before = registry(home.path());
    linodectl(&home)
        .args(["destroy", "db.01"])
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("No action taken."))
        .stderr(predicate::str::contains(
            "Do you really want to destroy this linode? [Y/n]",
        ));
    assert_eq!(registry(home.path()), before);
}

#[test]
fn test_forced_destroy_against_dead_api_still_forgets_instance() {
    let home = seeded_home();
    linodectl(&home)
        .args(["destroy", "db/db.01", "--force"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not fully destroyed"));

    let after = registry(home.path());
    assert!(after["db"]["instances"].get("db.01").is_none());
    assert!(after.get("web").is_some());
}

#[test]
fn test_provider_failure_is_api_error() {
    let home = seeded_home();
    let assert = linodectl(&home)
        .args(["--json", "shutdown", "db.01"])
        .assert()
        .code(1);
    let v: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(v["code"], "api_error");
}
