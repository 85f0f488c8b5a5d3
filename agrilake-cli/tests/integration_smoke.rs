//! Smoke tests to verify command wiring

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_serve() {
    let mut cmd = Command::cargo_bin("agrilake").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("serve"));
}

#[test]
fn test_serve_help() {
    let mut cmd = Command::cargo_bin("agrilake").unwrap();
    cmd.arg("serve").arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--farm-database-url"))
        .stdout(predicate::str::contains("--memory"));
}

#[test]
fn test_serve_exits_when_store_unreachable() {
    let mut cmd = Command::cargo_bin("agrilake").unwrap();
    cmd.arg("serve")
        .arg("--bind")
        .arg("127.0.0.1:0")
        .arg("--farm-database-url")
        .arg("postgres://agrilake@127.0.0.1:1/farmdb")
        .env_remove("AGRILAKE_BIND")
        .timeout(std::time::Duration::from_secs(30));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("farm store"));
}

#[test]
fn test_invalid_bind_address() {
    let mut cmd = Command::cargo_bin("agrilake").unwrap();
    cmd.arg("serve").arg("--bind").arg("not-an-address");

    cmd.assert().failure();
}
