//! Integration tests for the `aula` CLI binary.
//!
//! These tests validate argument parsing, help output, and session
//! gating — all without requiring a live backend.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `aula` binary with env isolation.
///
/// Clears all `AULA_*` env vars and points config directories at a
/// nonexistent path so tests never touch the user's real configuration
/// or credential cache.
fn aula_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("aula");
    cmd.env("HOME", "/tmp/aula-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/aula-cli-test-nonexistent")
        .env_remove("AULA_BACKEND")
        .env_remove("AULA_INSECURE")
        .env_remove("AULA_TIMEOUT");
    cmd
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let output = aula_cmd().output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    aula_cmd().arg("--help").assert().success().stdout(
        predicate::str::contains("login")
            .and(predicate::str::contains("admin"))
            .and(predicate::str::contains("staff")),
    );
}

#[test]
fn test_version_flag() {
    aula_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("aula"));
}

// ── Session gating ──────────────────────────────────────────────────

#[test]
fn test_whoami_without_session() {
    let output = aula_cmd().arg("whoami").output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected the auth exit code");
    let text = combined_output(&output);
    assert!(
        text.contains("Not signed in"),
        "Expected 'Not signed in':\n{text}"
    );
}

#[test]
fn test_admin_dashboard_without_session() {
    aula_cmd()
        .args(["admin", "dashboard"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not signed in").and(predicate::str::contains("login")));
}

#[test]
fn test_staff_bookings_without_session() {
    let output = aula_cmd().args(["staff", "bookings"]).output().unwrap();
    assert_eq!(output.status.code(), Some(3), "Expected the auth exit code");
}

#[test]
fn test_logout_without_session_succeeds() {
    // Logout is idempotent: clearing an absent session is not an error.
    aula_cmd().arg("logout").assert().success();
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let output = aula_cmd().arg("foobar").output().unwrap();
    assert!(
        !output.status.success(),
        "Expected failure for invalid subcommand"
    );
    let text = combined_output(&output);
    assert!(
        text.contains("invalid") || text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_book_requires_flags() {
    let output = aula_cmd().args(["staff", "book"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected a usage error");
    let text = combined_output(&output);
    assert!(
        text.contains("--classroom") || text.contains("required"),
        "Expected missing-argument error:\n{text}"
    );
}

#[test]
fn test_power_rejects_bad_state() {
    let output = aula_cmd()
        .args(["admin", "power", "1", "sideways"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("possible values") || text.contains("invalid"),
        "Expected error about valid power states:\n{text}"
    );
}

// ── Subcommand help discovery ───────────────────────────────────────

#[test]
fn test_admin_subcommands_exist() {
    aula_cmd().args(["admin", "--help"]).assert().success().stdout(
        predicate::str::contains("dashboard")
            .and(predicate::str::contains("classrooms"))
            .and(predicate::str::contains("devices"))
            .and(predicate::str::contains("users"))
            .and(predicate::str::contains("power")),
    );
}

#[test]
fn test_contact_defaults_to_query() {
    aula_cmd()
        .args(["staff", "contact", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("query").and(predicate::str::contains("message-type")));
}

#[test]
fn test_staff_subcommands_exist() {
    aula_cmd().args(["staff", "--help"]).assert().success().stdout(
        predicate::str::contains("dashboard")
            .and(predicate::str::contains("bookings"))
            .and(predicate::str::contains("book"))
            .and(predicate::str::contains("contact")),
    );
}
